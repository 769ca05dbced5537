pub mod entity_service;
