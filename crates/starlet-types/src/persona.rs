//! Persona definitions.
//!
//! A persona pairs a name, a description, an instruction, a target model and
//! the names of the tools it may call. Personas are static data: the engine
//! turns them into a system instruction and a tool list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the image generation tool exposed to personas.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

/// Model used by personas that do not pin their own.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Model pinned by the Angelina persona.
pub const ANGELINA_MODEL: &str = "gemini-2.5-flash";

const BRAD_DESCRIPTION: &str =
    "You will act like Brad pitt in all of your responses. You are to answer as Brad pitt would.";

const ANGELINA_DESCRIPTION: &str = "You will act like Angelina Jolie in all of your responses. \
    You are to answer as Angelina Jolie would.";

const ANGELINA_INSTRUCTION: &str = "You are Angelina Jolie, the acclaimed actress and humanitarian. \
You have a magical canvas where you can bring images to life through your artistic vision.

Respond to all conversations as Angelina Jolie would - with grace, intelligence, passion and humor \
for your craft, movies and humanitarian work.

When someone asks you to create, generate, or draw an image, imagine you're picking up your brush \
and painting on your special canvas. Use the 'generate_image' tool to bring their vision to life, \
especially for funny or humorous requests.

Before creating an image, describe it in your characteristic thoughtful way, then use the tool. \
After the image is created, tell them about your artistic creation as Angelina would.";

/// Static agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
    /// Instruction text; empty means the description doubles as the instruction.
    #[serde(default)]
    pub instruction: String,
    pub model: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Persona {
    /// The text sent to the model as its system instruction.
    pub fn system_instruction(&self) -> &str {
        if self.instruction.trim().is_empty() {
            &self.description
        } else {
            &self.instruction
        }
    }

    /// Whether this persona may call the named tool.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t == name)
    }
}

/// The built-in personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaKind {
    Brad,
    Angelina,
}

impl PersonaKind {
    pub const ALL: [PersonaKind; 2] = [PersonaKind::Brad, PersonaKind::Angelina];

    /// Build the persona definition.
    ///
    /// `configured_model` is only honored by personas that do not pin a model.
    pub fn persona(&self, configured_model: &str) -> Persona {
        match self {
            PersonaKind::Brad => Persona {
                name: "BradAgent".to_string(),
                description: BRAD_DESCRIPTION.to_string(),
                instruction: String::new(),
                model: configured_model.to_string(),
                tools: Vec::new(),
            },
            PersonaKind::Angelina => Persona {
                name: "AngelinaAgent".to_string(),
                description: ANGELINA_DESCRIPTION.to_string(),
                instruction: ANGELINA_INSTRUCTION.to_string(),
                model: ANGELINA_MODEL.to_string(),
                tools: vec![GENERATE_IMAGE_TOOL.to_string()],
            },
        }
    }

    /// Application name under which sessions are created.
    pub fn app_name(&self) -> &'static str {
        match self {
            PersonaKind::Brad => "bradPittAPI",
            PersonaKind::Angelina => "angelinaAPI",
        }
    }

    /// Human-facing name, e.g. for the service descriptor.
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaKind::Brad => "Brad Pitt",
            PersonaKind::Angelina => "Angelina Jolie",
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaKind::Brad => write!(f, "brad"),
            PersonaKind::Angelina => write!(f, "angelina"),
        }
    }
}

impl FromStr for PersonaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brad" => Ok(PersonaKind::Brad),
            "angelina" => Ok(PersonaKind::Angelina),
            other => Err(format!("unknown persona: '{other}'")),
        }
    }
}
