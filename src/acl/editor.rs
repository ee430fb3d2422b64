//! Stateful front of the reconciler: keeps the text-field projection and
//! list views in step with every mutation.
use crate::acl::{AclState, ListKind};
use crate::error::AclError;
use crate::form::FormFields;

/// Called with `(allowed, blocked)` after every applied mutation.
pub type RenderListener = Box<dyn FnMut(&[String], &[String]) + Send>;

pub struct AclEditor {
    state: AclState,
    fields: FormFields,
    listeners: Vec<RenderListener>,
}

impl AclEditor {
    pub fn new(state: AclState) -> Self {
        let fields = FormFields::from_state(&state);
        Self {
            state,
            fields,
            listeners: Vec::new(),
        }
    }

    pub fn from_fields(fields: &FormFields) -> Self {
        Self::new(AclState::parse(&fields.allowed_users, &fields.blocked_users))
    }

    pub fn state(&self) -> &AclState {
        &self.state
    }

    /// Current serialized projection. Always equals `state().serialize()`.
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    /// Register a render listener; it runs once right away with the current lists.
    pub fn subscribe<F>(&mut self, mut listener: F)
    where
        F: FnMut(&[String], &[String]) + Send + 'static,
    {
        listener(self.state.allowed().as_slice(), self.state.blocked().as_slice());
        self.listeners.push(Box::new(listener));
    }

    pub fn add_to_allow(&mut self, username: &str) -> Result<(), AclError> {
        self.add_to(ListKind::Allow, username)
    }

    pub fn add_to_block(&mut self, username: &str) -> Result<(), AclError> {
        self.add_to(ListKind::Block, username)
    }

    /// Rejected additions leave fields untouched and do not re-render.
    pub fn add_to(&mut self, kind: ListKind, username: &str) -> Result<(), AclError> {
        if let Err(e) = self.state.add_to(kind, username) {
            tracing::info!(list = kind.label(), error = %e, "rejected acl change");
            return Err(e);
        }
        self.sync();
        Ok(())
    }

    pub fn remove_from_both(&mut self, username: &str) {
        self.state.remove_from_both(username);
        self.sync();
    }

    fn sync(&mut self) {
        self.fields = FormFields::from_state(&self.state);
        let allowed = self.state.allowed().as_slice();
        let blocked = self.state.blocked().as_slice();
        for listener in self.listeners.iter_mut() {
            listener(allowed, blocked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Renders = Arc<Mutex<Vec<(Vec<String>, Vec<String>)>>>;

    fn recording_editor(allowed: &str, blocked: &str) -> (AclEditor, Renders) {
        let renders: Renders = Arc::default();
        let mut editor = AclEditor::from_fields(&FormFields {
            allowed_users: allowed.into(),
            blocked_users: blocked.into(),
        });
        let sink = Arc::clone(&renders);
        editor.subscribe(move |a, b| sink.lock().unwrap().push((a.to_vec(), b.to_vec())));
        (editor, renders)
    }

    #[test]
    fn subscribe_renders_initial_lists() {
        let (_editor, renders) = recording_editor("alice", "bob");
        let r = renders.lock().unwrap();
        assert_eq!(r.len(), 1);
        assert_eq!(r[0], (vec!["alice".to_string()], vec!["bob".to_string()]));
    }

    #[test]
    fn mutations_update_fields_and_render() {
        let (mut editor, renders) = recording_editor("alice,bob", "");
        editor.add_to_block("alice").unwrap();
        assert_eq!(editor.fields().allowed_users, "bob");
        assert_eq!(editor.fields().blocked_users, "alice");
        editor.remove_from_both("nobody");
        assert_eq!(renders.lock().unwrap().len(), 3);
    }

    #[test]
    fn conflict_does_not_render_or_touch_fields() {
        let (mut editor, renders) = recording_editor("", "carol");
        let before = editor.fields().clone();
        assert!(matches!(
            editor.add_to_allow("carol"),
            Err(AclError::Conflict { .. })
        ));
        assert_eq!(editor.fields(), &before);
        assert_eq!(renders.lock().unwrap().len(), 1);
    }
}
