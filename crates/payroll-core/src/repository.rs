//! Typed repositories over the storage service.
//!
//! A repository owns one namespace of the store and exposes the CRUD
//! accessors the record services are written against. Identifiers are
//! allocated from a per-namespace sequence kept in the store itself.

use payroll_storage::{StorageError, StorageService};
use payroll_types::{Employee, Order, StorageKey};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A persisted aggregate with a numeric identifier.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
	/// Namespace the aggregate is stored under.
	const KEY: StorageKey;

	/// Returns the identifier of this record.
	fn id(&self) -> u64;
}

impl Entity for Employee {
	const KEY: StorageKey = StorageKey::Employees;

	fn id(&self) -> u64 {
		self.id
	}
}

impl Entity for Order {
	const KEY: StorageKey = StorageKey::Orders;

	fn id(&self) -> u64 {
		self.id
	}
}

/// CRUD accessors for one aggregate type.
pub struct Repository<T> {
	storage: Arc<StorageService>,
	/// Serializes identifier allocation.
	sequence: Mutex<()>,
	_entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self {
			storage,
			sequence: Mutex::new(()),
			_entity: PhantomData,
		}
	}

	fn namespace() -> &'static str {
		T::KEY.as_str()
	}

	/// Returns every record, ordered by identifier.
	pub async fn find_all(&self) -> Result<Vec<T>, StorageError> {
		let mut records: Vec<T> = self.storage.retrieve_all(Self::namespace()).await?;
		records.sort_by_key(|record| record.id());
		Ok(records)
	}

	pub async fn find_by_id(&self, id: u64) -> Result<Option<T>, StorageError> {
		self.storage.find(Self::namespace(), &id.to_string()).await
	}

	pub async fn exists_by_id(&self, id: u64) -> Result<bool, StorageError> {
		self.storage.exists(Self::namespace(), &id.to_string()).await
	}

	/// Stores the record under its own identifier, creating or overwriting it.
	pub async fn save(&self, record: &T) -> Result<(), StorageError> {
		self.storage
			.store(Self::namespace(), &record.id().to_string(), record)
			.await
	}

	/// Overwrites an existing record, failing with `NotFound` if it is gone.
	pub async fn update(&self, record: &T) -> Result<(), StorageError> {
		self.storage
			.update(Self::namespace(), &record.id().to_string(), record)
			.await
	}

	/// Allocates a fresh identifier, builds the record with it and stores it.
	///
	/// Identifiers already taken (for instance by a client-chosen upsert) are
	/// skipped, and released identifiers are never handed out again.
	pub async fn insert_with<F>(&self, build: F) -> Result<T, StorageError>
	where
		F: FnOnce(u64) -> T + Send,
	{
		let _guard = self.sequence.lock().await;
		let sequences = StorageKey::Sequences.as_str();

		let mut next: u64 = self
			.storage
			.find(sequences, Self::namespace())
			.await?
			.unwrap_or(0);
		loop {
			next += 1;
			if !self.exists_by_id(next).await? {
				break;
			}
		}
		self.storage
			.store(sequences, Self::namespace(), &next)
			.await?;

		let record = build(next);
		self.save(&record).await?;
		Ok(record)
	}

	/// Removes the record. Removing an absent identifier succeeds.
	pub async fn delete_by_id(&self, id: u64) -> Result<(), StorageError> {
		self.storage.remove(Self::namespace(), &id.to_string()).await
	}
}
