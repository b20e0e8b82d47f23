use anyhow::{anyhow, Result};
use roster_core::config::{Config, ENV_BOT_TOKEN};
use roster_server::BotAuth;
use std::sync::Arc;

pub fn run(config: Config, listen: Option<String>) -> Result<()> {
    let token = config.bot_token.clone().ok_or_else(|| {
        anyhow!(
            "{ENV_BOT_TOKEN} is not set\n\
             The webhook refuses to start without a bot credential."
        )
    })?;
    let addr = listen.unwrap_or_else(|| config.listen.clone());

    // Built outside the runtime: the oracle's blocking HTTP client must not
    // be created or dropped on an async thread.
    let roster = Arc::new(roster_core::build(&config)?);

    let rt = tokio::runtime::Runtime::new()?;
    let served = roster.clone();
    rt.block_on(async move {
        roster_server::serve(served, BotAuth::with_token(token), config.bot_id, &addr).await
    })?;
    drop(rt);
    drop(roster);
    Ok(())
}
