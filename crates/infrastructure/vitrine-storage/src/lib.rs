mod client;

pub use client::{default_client, HttpObjectStore, ObjectStoreError};
