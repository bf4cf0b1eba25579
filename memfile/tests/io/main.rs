//! Integration tests for the storage module

mod bytestore;
