//! `starlet personas` -- list the built-in personas.

use anyhow::Result;
use console::style;

use starlet_types::config::ServiceConfig;
use starlet_types::persona::PersonaKind;

pub fn list_personas(config: &ServiceConfig, json: bool) -> Result<()> {
    if json {
        let personas: Vec<_> = PersonaKind::ALL
            .iter()
            .map(|kind| {
                let persona = kind.persona(&config.model);
                serde_json::json!({
                    "id": kind.to_string(),
                    "name": persona.name,
                    "display_name": kind.display_name(),
                    "app_name": kind.app_name(),
                    "model": persona.model,
                    "tools": persona.tools,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&personas)?);
        return Ok(());
    }

    println!();
    for kind in PersonaKind::ALL {
        let persona = kind.persona(&config.model);
        println!(
            "  {} {} ({})",
            style(kind.to_string()).cyan().bold(),
            kind.display_name(),
            style(&persona.name).dim()
        );
        println!("      model: {}", persona.model);
        if !persona.tools.is_empty() {
            println!("      tools: {}", persona.tools.join(", "));
        }
    }
    println!();
    Ok(())
}
