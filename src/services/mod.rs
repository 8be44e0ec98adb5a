// src/services/mod.rs
pub mod admin_session;
pub mod gemini_service;
pub mod image_processor;
pub mod kv_store;
pub mod profile_repository;
pub mod profile_store;
pub mod ranking;

pub use admin_session::AdminSession;
pub use gemini_service::{Analysis, GeminiService, ProfileAnalyzer};
pub use image_processor::ImageProcessor;
pub use kv_store::{KeyValueStore, MemoryStore, RedisStore};
pub use profile_repository::ProfileRepository;
pub use profile_store::ProfileStore;
