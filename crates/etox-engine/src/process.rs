//! Ejecución del proceso externo con timeout y cancelación.
//!
//! El proceso se lanza por argv (sin shell). stdin/stdout van a null y stderr
//! a un archivo del workspace, que sólo se lee si el proceso falla.
use std::fs::File;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::{CancellationToken, EngineError};

/// Máximo de bytes de stderr incluidos en `EngineError::ProcessFailed`.
pub const STDERR_TAIL_BYTES: usize = 2048;

/// Límites de espera de una corrida.
#[derive(Debug, Clone, Copy)]
pub struct WaitLimits {
    pub timeout: Option<Duration>,
    pub poll_interval: Duration,
}

/// Lanza `command` y bloquea hasta que termine, venza el timeout o se cancele.
/// En los dos últimos casos el hijo se mata y se recoge antes de retornar.
pub fn run_to_completion(mut command: Command,
                         limits: WaitLimits,
                         cancel: &CancellationToken,
                         stderr_log: &Path)
                         -> Result<(), EngineError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let stderr = File::create(stderr_log)?;
    command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::from(stderr));

    let mut child = command.spawn()
                           .map_err(|source| EngineError::Spawn { program: program.clone(), source })?;
    debug!("process:spawned program={program} pid={}", child.id());
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("process:exited program={program} status={status} elapsed_ms={}", started.elapsed().as_millis());
                if status.success() {
                    return Ok(());
                }
                return Err(EngineError::ProcessFailed { program,
                                                        code: status.code(),
                                                        stderr: read_tail(stderr_log) });
            }
            Ok(None) => {}
            Err(e) => {
                terminate(&mut child);
                return Err(e.into());
            }
        }
        if cancel.is_cancelled() {
            warn!("process:cancelled program={program}");
            terminate(&mut child);
            return Err(EngineError::Cancelled);
        }
        if let Some(limit) = limits.timeout {
            if started.elapsed() >= limit {
                warn!("process:timeout program={program} limit_ms={}", limit.as_millis());
                terminate(&mut child);
                return Err(EngineError::Timeout(limit));
            }
        }
        thread::sleep(limits.poll_interval);
    }
}

fn terminate(child: &mut Child) {
    if let Err(e) = child.kill() {
        warn!("process:kill error pid={} err={e}", child.id());
    }
    if let Err(e) = child.wait() {
        warn!("process:reap error pid={} err={e}", child.id());
    }
}

/// Últimos `STDERR_TAIL_BYTES` del log de stderr (vacío si no se puede leer).
fn read_tail(path: &Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => {
            let start = bytes.len().saturating_sub(STDERR_TAIL_BYTES);
            String::from_utf8_lossy(&bytes[start..]).trim().to_string()
        }
        Err(e) => {
            warn!("process:stderr unreadable path={} err={e}", path.display());
            String::new()
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn limits(timeout_ms: Option<u64>) -> WaitLimits {
        WaitLimits { timeout: timeout_ms.map(Duration::from_millis),
                     poll_interval: Duration::from_millis(10) }
    }

    fn sh(script: &str) -> Command {
        let mut c = Command::new("sh");
        c.arg("-c").arg(script);
        c
    }

    #[test]
    fn success_returns_ok() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stderr.log");
        run_to_completion(sh("exit 0"), limits(None), &CancellationToken::new(), &log).unwrap();
    }

    #[test]
    fn non_zero_exit_reports_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stderr.log");
        let err = run_to_completion(sh("echo boom >&2; exit 3"), limits(None), &CancellationToken::new(), &log).unwrap_err();
        match err {
            EngineError::ProcessFailed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn timeout_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stderr.log");
        let started = Instant::now();
        let err = run_to_completion(sh("sleep 5"), limits(Some(100)), &CancellationToken::new(), &log).unwrap_err();
        assert!(matches!(err, EngineError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stderr.log");
        let cmd = Command::new("definitely-not-an-etox-binary");
        let err = run_to_completion(cmd, limits(None), &CancellationToken::new(), &log).unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
    }

    #[test]
    fn tail_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("stderr.log");
        std::fs::write(&log, "x".repeat(STDERR_TAIL_BYTES * 2)).unwrap();
        assert_eq!(read_tail(&log).len(), STDERR_TAIL_BYTES);
    }
}
