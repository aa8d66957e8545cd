//! Actions shown by the tool strip.
//!
//! An [`Action`] is the logical unit of toolbar functionality. It is independent
//! of its visual form: the tool strip asks a representation provider to build a
//! visual for it and decides, each pass, whether that visual renders fully,
//! as an icon, or not at all.
//!
//! Actions are shared as `Arc<Action>`. Their flags are changed through `&self`
//! setters, and every setter that changes a value emits [`Action::changed`], which
//! the tool strip listens to in order to schedule a new layout pass.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolstrip::Action;
//!
//! let save = Arc::new(Action::new("Save").with_keep_visible(true));
//! let print = Arc::new(Action::new("Print"));
//!
//! assert!(save.keep_visible());
//! print.set_explicitly_hidden(true);
//! assert!(print.is_explicitly_hidden());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use toolstrip_core::{Property, Signal};

/// Stable identity of an action.
///
/// Identities are unique for the lifetime of the process and are used to key
/// cached representations across layout passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(u64);

impl ActionId {
    /// Get the raw u64 value of this action ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

fn next_action_id() -> ActionId {
    ActionId(NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Identifies a representation template known to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(u64);

impl TemplateId {
    /// Create a template identifier from a provider-defined value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A command that can be placed in a tool strip.
pub struct Action {
    id: ActionId,
    text: RwLock<String>,
    keep_visible: Property<bool>,
    explicitly_hidden: Property<bool>,
    icon_only: Property<bool>,
    always_overflow: Property<bool>,
    template: Property<Option<TemplateId>>,

    /// Emitted whenever one of the action's properties changes.
    pub changed: Signal<()>,
}

impl Action {
    /// Create a new action with the given label.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: next_action_id(),
            text: RwLock::new(text.into()),
            keep_visible: Property::new(false),
            explicitly_hidden: Property::new(false),
            icon_only: Property::new(false),
            always_overflow: Property::new(false),
            template: Property::new(None),
            changed: Signal::new(),
        }
    }

    /// The action's stable identity.
    pub fn id(&self) -> ActionId {
        self.id
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Get the label.
    pub fn text(&self) -> String {
        self.text.read().clone()
    }

    /// Set the label.
    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        let changed = {
            let mut current = self.text.write();
            if *current != text {
                *current = text;
                true
            } else {
                false
            }
        };
        if changed {
            self.changed.emit(());
        }
    }

    // =========================================================================
    // Layout flags
    // =========================================================================

    /// Whether the action asks to stay visible when space runs out.
    pub fn keep_visible(&self) -> bool {
        self.keep_visible.get()
    }

    /// Ask for best-effort preservation of this action's visibility.
    pub fn set_keep_visible(&self, keep_visible: bool) {
        if self.keep_visible.set(keep_visible) {
            self.changed.emit(());
        }
    }

    /// Set keep-visible using builder pattern.
    pub fn with_keep_visible(self, keep_visible: bool) -> Self {
        self.keep_visible.set_silent(keep_visible);
        self
    }

    /// Whether the consumer has hidden this action outright.
    ///
    /// Explicitly hidden actions never take part in width accounting and are
    /// not reported as overflowed.
    pub fn is_explicitly_hidden(&self) -> bool {
        self.explicitly_hidden.get()
    }

    /// Hide or show the action regardless of available space.
    pub fn set_explicitly_hidden(&self, hidden: bool) {
        if self.explicitly_hidden.set(hidden) {
            self.changed.emit(());
        }
    }

    /// Set explicit visibility using builder pattern.
    pub fn with_explicitly_hidden(self, hidden: bool) -> Self {
        self.explicitly_hidden.set_silent(hidden);
        self
    }

    /// Whether the action is always rendered in its reduced (icon) form.
    pub fn is_icon_only(&self) -> bool {
        self.icon_only.get()
    }

    /// Force the reduced (icon) form for this action.
    pub fn set_icon_only(&self, icon_only: bool) {
        if self.icon_only.set(icon_only) {
            self.changed.emit(());
        }
    }

    /// Set icon-only using builder pattern.
    pub fn with_icon_only(self, icon_only: bool) -> Self {
        self.icon_only.set_silent(icon_only);
        self
    }

    /// Whether the action always lives in the overflow indicator.
    pub fn always_overflow(&self) -> bool {
        self.always_overflow.get()
    }

    /// Send this action to the overflow indicator regardless of available space.
    ///
    /// Such an action never gets an in-strip representation and contributes
    /// nothing to the natural size, but it is reported as hidden, so the
    /// indicator shows even when every other action fits.
    pub fn set_always_overflow(&self, always_overflow: bool) {
        if self.always_overflow.set(always_overflow) {
            self.changed.emit(());
        }
    }

    /// Set always-overflow using builder pattern.
    pub fn with_always_overflow(self, always_overflow: bool) -> Self {
        self.always_overflow.set_silent(always_overflow);
        self
    }

    // =========================================================================
    // Template override
    // =========================================================================

    /// The custom full-representation template, if any.
    pub fn template(&self) -> Option<TemplateId> {
        self.template.get()
    }

    /// Override the template used to build this action's representation.
    ///
    /// Changing the template makes the tool strip rebuild the representation
    /// on its next pass.
    pub fn set_template(&self, template: Option<TemplateId>) {
        if self.template.set(template) {
            self.changed.emit(());
        }
    }

    /// Set the template override using builder pattern.
    pub fn with_template(self, template: TemplateId) -> Self {
        self.template.set_silent(Some(template));
        self
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("text", &*self.text.read())
            .field("keep_visible", &self.keep_visible())
            .field("explicitly_hidden", &self.is_explicitly_hidden())
            .field("icon_only", &self.is_icon_only())
            .field("always_overflow", &self.always_overflow())
            .field("template", &self.template())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_action_ids_are_unique() {
        let a = Action::new("A");
        let b = Action::new("B");
        assert_ne!(a.id(), b.id());
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_action_builders() {
        let action = Action::new("Save")
            .with_keep_visible(true)
            .with_icon_only(true)
            .with_template(TemplateId::new(7));

        assert!(action.keep_visible());
        assert!(action.is_icon_only());
        assert!(!action.is_explicitly_hidden());
        assert!(!action.always_overflow());
        assert!(Action::new("Help").with_always_overflow(true).always_overflow());
        assert_eq!(action.template(), Some(TemplateId::new(7)));
    }

    #[test]
    fn test_action_changed_only_on_real_change() {
        let action = Action::new("Open");
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        action.changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        action.set_keep_visible(false);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        action.set_keep_visible(true);
        action.set_explicitly_hidden(true);
        action.set_icon_only(true);
        action.set_always_overflow(true);
        action.set_template(Some(TemplateId::new(1)));
        action.set_text("Open...");
        assert_eq!(count.load(Ordering::SeqCst), 6);

        action.set_text("Open...");
        action.set_always_overflow(true);
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_action_id_display() {
        let action = Action::new("X");
        assert_eq!(
            action.id().to_string(),
            format!("action#{}", action.id().as_u64())
        );
    }
}
