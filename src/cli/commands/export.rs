use crate::cli::commands::{audit, open_pool};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        user,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let rows = ExportLogic::export(
            &pool,
            *format,
            file,
            range.as_deref(),
            user.as_deref(),
            *force,
        )?;
        if rows > 0 {
            audit(
                &pool,
                "export",
                format.as_str(),
                &format!("{rows} row(s) to {file}"),
            );
        }
    }
    Ok(())
}
