use crate::app::AppContext;
use crate::cli::{OpenArgs, SealArgs};
use crate::commands::open_error;
use crate::helpers::read_input;

pub fn handle_seal(ctx: &AppContext, args: &SealArgs) -> anyhow::Result<()> {
    let manager = ctx.active_manager()?;
    let text = read_input(args.text.clone(), "text")?;
    let envelope = manager.seal(&text)?;
    println!("{}", envelope);
    Ok(())
}

pub fn handle_open(ctx: &AppContext, args: &OpenArgs) -> anyhow::Result<()> {
    let manager = ctx.active_manager()?;
    let envelope = read_input(args.envelope.clone(), "envelope")?;
    let plaintext = manager.open(envelope.trim()).map_err(open_error)?;
    println!("{}", plaintext);
    Ok(())
}
