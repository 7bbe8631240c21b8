// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Collaborator implementations.
//!
//! - [`inventory`] - account, compute and DNS APIs backed by an inventory document
//! - [`file_store`] - registration store persisted as a JSON file
//! - [`memory_store`] - registration store held in memory

pub mod file_store;
pub mod inventory;
pub mod memory_store;

pub use file_store::JsonFileStore;
pub use inventory::{Inventory, InventoryCloud, InventoryZone};
pub use memory_store::MemoryStore;
