//! Registry of tool contexts the host can instantiate by class name

use crate::config::ToolConfig;
use crate::context::DrawCurveContext;
use crate::{CONTEXT_CLASS, TOOL_COMMAND};
use quill_core::{QuillError, Result};
use std::collections::BTreeMap;

/// Builds a fresh context for one activation of a tool
pub type ContextFactory = Box<dyn Fn() -> Result<DrawCurveContext>>;

struct Registration {
    command: String,
    factory: ContextFactory,
    created: u64,
}

/// Context classes by name, each paired with the command its strokes record
#[derive(Default)]
pub struct ToolRegistry {
    entries: BTreeMap<String, Registration>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        class: impl Into<String>,
        command: impl Into<String>,
        factory: ContextFactory,
    ) -> Result<()> {
        let class = class.into();
        if self.entries.contains_key(&class) {
            return Err(QuillError::RegistryError(format!(
                "context class '{class}' is already registered"
            )));
        }
        let command = command.into();
        log::debug!("registered context '{class}' (command '{command}')");
        self.entries.insert(
            class,
            Registration {
                command,
                factory,
                created: 0,
            },
        );
        Ok(())
    }

    pub fn deregister(&mut self, class: &str) -> Result<()> {
        if self.entries.remove(class).is_none() {
            return Err(unknown(class));
        }
        log::debug!("deregistered context '{class}'");
        Ok(())
    }

    pub fn is_registered(&self, class: &str) -> bool {
        self.entries.contains_key(class)
    }

    /// Command name recorded by contexts of `class`
    pub fn command_for(&self, class: &str) -> Option<&str> {
        self.entries.get(class).map(|r| r.command.as_str())
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Instantiate `class`. Returns the context and its instance name
    /// (`<class>1`, `<class>2`, ...).
    pub fn create_context(&mut self, class: &str) -> Result<(String, DrawCurveContext)> {
        let entry = self.entries.get_mut(class).ok_or_else(|| unknown(class))?;
        let context = (entry.factory)()?;
        entry.created += 1;
        Ok((format!("{class}{}", entry.created), context))
    }
}

fn unknown(class: &str) -> QuillError {
    QuillError::RegistryError(format!("unknown context class '{class}'"))
}

/// Register the draw curve context; every instance starts from `config`
pub fn register_draw_curve(registry: &mut ToolRegistry, config: ToolConfig) -> Result<()> {
    config.validate()?;
    registry.register(
        CONTEXT_CLASS,
        TOOL_COMMAND,
        Box::new(move || DrawCurveContext::new(config.clone())),
    )
}
