//! `starlet chat` -- run prompts against a persona from the terminal.

use anyhow::Result;
use console::style;

use starlet_core::runner::ConversationRunner;
use starlet_infra::factory::build_runner;
use starlet_types::config::ServiceConfig;
use starlet_types::persona::PersonaKind;

/// One answered prompt.
#[derive(Debug, serde::Serialize)]
pub struct ChatTurn {
    pub prompt: String,
    pub response: String,
    pub user_id: String,
    pub session_id: String,
}

/// Send `prompts` in order, all in one session, and print each reply.
pub async fn run_chat(
    config: &ServiceConfig,
    persona: PersonaKind,
    user: Option<String>,
    session: Option<String>,
    prompts: Vec<String>,
    json: bool,
) -> Result<()> {
    let runner = build_runner(persona, config)?;
    let user_id = user.unwrap_or_else(|| runner.default_user_id().to_string());

    let last_session = run_turns(&runner, &user_id, session, prompts, |turn| {
        if json {
            println!("{}", serde_json::to_string(turn)?);
        } else {
            println!();
            println!("  {} {}", style("You:").bold(), turn.prompt);
            println!(
                "  {} {}",
                style(format!("{}:", persona.display_name())).cyan().bold(),
                turn.response
            );
        }
        Ok(())
    })
    .await?;

    if !json {
        if let Some(session_id) = last_session {
            println!();
            println!("  {}", style(format!("session: {session_id}")).dim());
        }
    }
    Ok(())
}

/// Run each prompt as a turn and hand it to `on_turn`.
///
/// The first turn may synthesise the session id; later turns reuse it.
/// Returns the session id used, if any prompt ran.
pub async fn run_turns(
    runner: &ConversationRunner,
    user_id: &str,
    session: Option<String>,
    prompts: Vec<String>,
    mut on_turn: impl FnMut(&ChatTurn) -> Result<()>,
) -> Result<Option<String>> {
    let mut session_id = session;

    for prompt in prompts {
        let reply = runner
            .run_agent(&prompt, Some(user_id), session_id.as_deref())
            .await?;

        let turn = ChatTurn {
            prompt,
            response: reply.response,
            user_id: user_id.to_string(),
            session_id: reply.session_id,
        };
        on_turn(&turn)?;
        session_id = Some(turn.session_id);
    }

    Ok(session_id)
}
