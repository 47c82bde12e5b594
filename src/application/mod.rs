// Application layer - query pipeline and resource use cases
pub mod frame_assembler;
pub mod grouping;
pub mod normalizer;
pub mod query_service;
pub mod request_builder;
pub mod resource_service;
pub mod upstream_client;
