pub mod etox_service;
