//! Built-in templates.

pub mod site;
pub mod site_visit;

use crate::error::Result;
use crate::template::TemplateRegistry;

/// Register every built-in template.
pub fn register(registry: &mut TemplateRegistry) -> Result<()> {
    registry.register(site::spec())?;
    registry.register(site_visit::spec())?;
    Ok(())
}
