//! HTML rendering of encounter pages via `minijinja`

use minijinja::{context, Environment};

use crate::encounter::Encounter;
use crate::error::RenderError;

const ENCOUNTER_TEMPLATE: &str = "encounter.html";

/// Renders encounter pages from the built-in template.
///
/// The `.html` template name turns on HTML auto-escaping, so combatant
/// names are escaped in the output.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(ENCOUNTER_TEMPLATE, include_str!("encounter.html"))?;
        Ok(Self { env })
    }

    /// Render the turn order of `encounter` as a page
    pub fn encounter(&self, encounter: &Encounter) -> Result<String, RenderError> {
        let template = self.env.get_template(ENCOUNTER_TEMPLATE)?;
        Ok(template.render(context! { encounter })?)
    }
}
