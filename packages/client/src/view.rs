use std::cell::Cell;
use std::rc::Rc;

/// Which input surfaces are shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub login_visible: bool,
    pub upload_visible: bool,
    pub search_visible: bool,
}

impl ViewState {
    /// Login form only.
    pub const INITIAL: Self = Self {
        login_visible: true,
        upload_visible: false,
        search_visible: false,
    };

    /// Upload and search, login hidden.
    pub const AUTHENTICATED: Self = Self {
        login_visible: false,
        upload_visible: true,
        search_visible: true,
    };

    pub fn is_authenticated(&self) -> bool {
        *self == Self::AUTHENTICATED
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Shared handle on the page's [`ViewState`].
///
/// Only the auth controller writes through it, and only once per session.
#[derive(Clone, Debug, Default)]
pub struct ViewHandle(Rc<Cell<ViewState>>);

impl ViewHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ViewState {
        self.0.get()
    }

    /// Hide login and show upload and search in one assignment.
    /// Returns false if the workspace was already revealed.
    pub(crate) fn reveal_workspace(&self) -> bool {
        if self.0.get().is_authenticated() {
            return false;
        }
        self.0.set(ViewState::AUTHENTICATED);
        true
    }
}
