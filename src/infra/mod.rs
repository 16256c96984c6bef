pub mod fee_service;
