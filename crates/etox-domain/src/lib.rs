// etox-domain library entry point
pub mod error;
pub mod record;
pub mod request;
pub mod smiles;
pub use error::DomainError;
pub use record::PredictionRecord;
pub use request::{mol_id, PredictionRequest, MOL_ID_PREFIX};
pub use smiles::Smiles;
