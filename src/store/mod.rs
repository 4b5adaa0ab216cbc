//! Todo list storage for the demo application.
//!
//! Items live in memory behind a `RwLock` and the whole list is written to a
//! JSON file after every mutation. A mutation is applied to a copy first and
//! only committed once the file write succeeded, so memory and disk agree.

mod error;

pub use error::StoreError;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::debug;
use crate::utils::date::DateTimeUtc;

/// A single todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

/// On-disk layout.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    next_id: u64,
    todos: Vec<Todo>,
}

/// Thread-safe, file-backed todo list in creation order.
pub struct TodoStore {
    path: PathBuf,
    max_todos: usize,
    state: RwLock<StoreState>,
}

impl TodoStore {
    /// Open the store at `path`; a missing file starts an empty list.
    pub fn open(path: impl Into<PathBuf>, max_todos: usize) -> Result<Self, StoreError> {
        let path = path.into();
        let state = restore(&path)?;
        debug!("store"; "loaded {} todos from {}", state.todos.len(), path.display());
        Ok(Self {
            path,
            max_todos,
            state: RwLock::new(state),
        })
    }

    /// All items, oldest first.
    pub fn list(&self) -> Vec<Todo> {
        self.state.read().todos.clone()
    }

    pub fn create(&self, text: &str) -> Result<Todo, StoreError> {
        self.mutate(|state| {
            if state.todos.len() >= self.max_todos {
                return Err(StoreError::Full(self.max_todos));
            }
            state.next_id += 1;
            let todo = Todo {
                id: format!("{:08x}", state.next_id),
                text: text.to_string(),
                completed: false,
                created_at: DateTimeUtc::from_system_time(SystemTime::now()).to_rfc3339(),
            };
            state.todos.push(todo.clone());
            Ok(todo)
        })
    }

    /// Flip `completed` on the item with `id`.
    pub fn toggle(&self, id: &str) -> Result<Todo, StoreError> {
        self.mutate(|state| {
            let todo = state
                .todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or(StoreError::NotFound)?;
            todo.completed = !todo.completed;
            Ok(todo.clone())
        })
    }

    /// Remove the item with `id`; returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool, StoreError> {
        if !self.state.read().todos.iter().any(|t| t.id == id) {
            return Ok(false);
        }
        self.mutate(|state| {
            let before = state.todos.len();
            state.todos.retain(|t| t.id != id);
            Ok(state.todos.len() < before)
        })
    }

    /// Remove every completed item; returns how many were removed.
    pub fn clear_completed(&self) -> Result<usize, StoreError> {
        self.mutate(|state| {
            let before = state.todos.len();
            state.todos.retain(|t| !t.completed);
            Ok(before - state.todos.len())
        })
    }

    /// Apply `f` to a copy, persist it, then publish it.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut state = self.state.write();
        let mut next = state.clone();
        let out = f(&mut next)?;
        persist(&next, &self.path)?;
        *state = next;
        Ok(out)
    }
}

fn restore(path: &Path) -> Result<StoreState, StoreError> {
    if !path.exists() {
        return Ok(StoreState::default());
    }
    let json = fs::read_to_string(path).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(path.to_path_buf(), e))
}

fn persist(state: &StoreState, path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StoreError::Io(parent.to_path_buf(), e))?;
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).map_err(|e| StoreError::Io(path.to_path_buf(), e))?;
    debug!("store"; "saved {} todos", state.todos.len());
    Ok(())
}
