//! Candidate collections and the id→collection cache.
//!
//! [`CollectionRoutes`] is explicit, instance-owned state: one value is
//! constructed at process start and handed to the [`EmployeeDirectory`]
//! (fresh per test). The cache is a best-effort hint rebuilt from scratch on
//! restart — it is never trusted without a live read.
//!
//! [`EmployeeDirectory`]: crate::EmployeeDirectory

use std::{
  collections::HashMap,
  sync::RwLock,
};

/// Collections the current application writes to, newest naming first.
pub const DEFAULT_WRITE_CANDIDATES: &[&str] = &["funcionarios", "employees"];

/// Known legacy/alternate collection names, probed for reads only.
pub const LEGACY_READ_CANDIDATES: &[&str] = &["fiscais", "colaboradores"];

/// Ordered candidate collections plus process-lifetime routing state.
pub struct CollectionRoutes {
  write_candidates: Vec<String>,
  read_candidates:  Vec<String>,
  /// id → collection the record was last found in. At most one entry per id.
  by_id:            RwLock<HashMap<String, String>>,
  /// The collection receiving all creations, once resolved.
  write_target:     RwLock<Option<String>>,
}

impl CollectionRoutes {
  /// Build routes from an ordered write-candidate list. Duplicates are
  /// dropped; an empty list falls back to the fixed defaults. Read candidates
  /// are the write candidates followed by the known legacy names.
  pub fn new<I, T>(write_candidates: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    let mut write: Vec<String> = Vec::new();
    for name in write_candidates {
      let name = name.into();
      if !name.is_empty() && !write.contains(&name) {
        write.push(name);
      }
    }
    if write.is_empty() {
      write = DEFAULT_WRITE_CANDIDATES.iter().map(|c| (*c).to_owned()).collect();
    }

    let mut read = write.clone();
    for name in LEGACY_READ_CANDIDATES {
      if !read.iter().any(|existing| existing == name) {
        read.push((*name).to_owned());
      }
    }

    Self {
      write_candidates: write,
      read_candidates:  read,
      by_id:            RwLock::new(HashMap::new()),
      write_target:     RwLock::new(None),
    }
  }

  pub fn write_candidates(&self) -> &[String] { &self.write_candidates }

  pub fn read_candidates(&self) -> &[String] { &self.read_candidates }

  /// The collection `id` was last found in, if any.
  pub fn cached(&self, id: &str) -> Option<String> {
    self.by_id.read().expect("routes lock").get(id).cloned()
  }

  /// Upsert the cache entry for `id`. If no write target is resolved yet and
  /// `collection` is a write candidate, adopt it immediately — a write
  /// candidate discovered active through a read path spares the probe pass.
  pub fn remember(&self, id: &str, collection: &str) {
    self
      .by_id
      .write()
      .expect("routes lock")
      .insert(id.to_owned(), collection.to_owned());

    let unresolved = self.write_target.read().expect("routes lock").is_none();
    if unresolved && self.write_candidates.iter().any(|c| c == collection) {
      self.set_write_target(collection);
    }
  }

  /// Upsert the cache entry for `id` and re-affirm `collection` as the write
  /// target. Used after a cached hint was verified by a live read.
  pub fn confirm(&self, id: &str, collection: &str) {
    self
      .by_id
      .write()
      .expect("routes lock")
      .insert(id.to_owned(), collection.to_owned());
    self.set_write_target(collection);
  }

  /// Drop the cache entry for `id` (record deleted, or the hint went stale).
  pub fn forget(&self, id: &str) {
    self.by_id.write().expect("routes lock").remove(id);
  }

  pub fn write_target(&self) -> Option<String> {
    self.write_target.read().expect("routes lock").clone()
  }

  pub fn set_write_target(&self, collection: &str) {
    *self.write_target.write().expect("routes lock") = Some(collection.to_owned());
  }
}

impl Default for CollectionRoutes {
  fn default() -> Self {
    Self::new(DEFAULT_WRITE_CANDIDATES.iter().copied())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_put_write_candidates_before_legacy_names() {
    let routes = CollectionRoutes::default();
    assert_eq!(routes.write_candidates(), ["funcionarios", "employees"]);
    assert_eq!(
      routes.read_candidates(),
      ["funcionarios", "employees", "fiscais", "colaboradores"]
    );
  }

  #[test]
  fn candidates_are_deduplicated() {
    let routes = CollectionRoutes::new(["equipe", "equipe", "fiscais"]);
    assert_eq!(routes.write_candidates(), ["equipe", "fiscais"]);
    // "fiscais" is already a read candidate; not appended twice.
    assert_eq!(
      routes.read_candidates(),
      ["equipe", "fiscais", "colaboradores"]
    );
  }

  #[test]
  fn empty_configuration_falls_back_to_defaults() {
    let routes = CollectionRoutes::new(Vec::<String>::new());
    assert_eq!(routes.write_candidates(), ["funcionarios", "employees"]);
  }

  #[test]
  fn remember_adopts_unresolved_write_candidate() {
    let routes = CollectionRoutes::default();
    assert_eq!(routes.write_target(), None);

    // Legacy collection: cached, but never adopted as write target.
    routes.remember("a", "fiscais");
    assert_eq!(routes.cached("a").as_deref(), Some("fiscais"));
    assert_eq!(routes.write_target(), None);

    // Write candidate: adopted.
    routes.remember("b", "employees");
    assert_eq!(routes.write_target().as_deref(), Some("employees"));

    // Already resolved: remember no longer changes it.
    routes.remember("c", "funcionarios");
    assert_eq!(routes.write_target().as_deref(), Some("employees"));
  }

  #[test]
  fn confirm_reaffirms_unconditionally() {
    let routes = CollectionRoutes::default();
    routes.remember("a", "employees");
    routes.confirm("b", "fiscais");
    assert_eq!(routes.write_target().as_deref(), Some("fiscais"));
  }

  #[test]
  fn forget_removes_only_that_id() {
    let routes = CollectionRoutes::default();
    routes.remember("a", "funcionarios");
    routes.remember("b", "funcionarios");
    routes.forget("a");
    assert_eq!(routes.cached("a"), None);
    assert_eq!(routes.cached("b").as_deref(), Some("funcionarios"));
  }
}
