use std::rc::Rc;

use log::debug;

use crate::platform::IconLibrary;

/// Re-runs the icon library over the document. Safe to call repeatedly;
/// already replaced placeholders are left alone by the library.
#[derive(Clone)]
pub struct IconRenderer {
    library: Rc<dyn IconLibrary>,
}

impl IconRenderer {
    pub fn new(library: Rc<dyn IconLibrary>) -> Self {
        Self { library }
    }

    /// Startup pass.
    pub fn mount(library: Rc<dyn IconLibrary>) -> Self {
        let renderer = Self::new(library);
        renderer.refresh();
        renderer
    }

    pub fn refresh(&self) {
        debug!("rendering icons");
        self.library.create_icons();
    }
}
