use anyhow::Result;
use roster_core::config::Config;

pub fn run(config: &Config, scope: &str, text: &str, json: bool) -> Result<()> {
    let roster = roster_core::build(config)?;
    let reply = roster.handle(scope, text);

    if json {
        println!("{}", serde_json::json!({ "scope": scope, "reply": reply }));
        return Ok(());
    }
    match reply {
        Some(text) => println!("{text}"),
        None => eprintln!("(no reply: not a command)"),
    }
    Ok(())
}
