use std::path::{Path, PathBuf};

use notecrypt_core::{AttachmentCodec, EncryptedAttachment};

use crate::app::AppContext;
use crate::cli::{AttachOpenArgs, AttachSealArgs};
use crate::commands::open_error;
use crate::errors::CliError;
use crate::helpers::infer_mime;
use crate::ui::{badge, Badge};

fn codec(ctx: &AppContext) -> AttachmentCodec {
    AttachmentCodec::new(ctx.config.attachments.max_bytes)
}

pub fn handle_attach_seal(ctx: &AppContext, args: &AttachSealArgs) -> anyhow::Result<()> {
    let manager = ctx.active_manager()?;
    let key = manager.key()?;

    let bytes = read_file(&args.file)?;
    let mime_type = match (&args.mime, infer_mime(&args.file)) {
        (Some(mime), _) => mime.clone(),
        (None, Some(mime)) => mime.to_string(),
        (None, None) => {
            return Err(CliError::invalid_input(format!(
                "Cannot infer MIME type for {}; pass --mime",
                args.file.display()
            ))
            .into())
        }
    };
    let file_name = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let record = codec(ctx).encrypt_attachment(&bytes, &mime_type, &file_name, &key)?;
    let json = serde_json::to_string_pretty(&record)?;

    match &args.out {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
            if !ctx.ui.quiet {
                println!(
                    "{}",
                    badge(
                        &ctx.ui,
                        Badge::Ok,
                        &format!("Sealed {} ({} bytes) to {}", file_name, bytes.len(), path.display())
                    )
                );
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn handle_attach_open(ctx: &AppContext, args: &AttachOpenArgs) -> anyhow::Result<()> {
    let manager = ctx.active_manager()?;
    let key = manager.key()?;

    let raw = read_file(&args.record)?;
    let record: EncryptedAttachment = serde_json::from_slice(&raw).map_err(|e| {
        CliError::invalid_input(format!(
            "{} is not a sealed attachment record: {}",
            args.record.display(),
            e
        ))
    })?;

    let bytes = codec(ctx)
        .decrypt_attachment(&record, &key)
        .map_err(open_error)?;

    let out = match &args.out {
        Some(path) => path.clone(),
        None => default_output_path(&record.file_name)?,
    };
    if !args.force && out.exists() {
        return Err(CliError::invalid_input(format!(
            "{} already exists; pass --force to overwrite or --out to choose another path",
            out.display()
        ))
        .into());
    }
    std::fs::write(&out, &bytes)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", out.display(), e))?;

    if !ctx.ui.quiet {
        println!(
            "{}",
            badge(
                &ctx.ui,
                Badge::Ok,
                &format!("Wrote {} ({}, {} bytes)", out.display(), record.mime_type, bytes.len())
            )
        );
    }
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(CliError::not_found(
            format!("File not found: {}", path.display()),
            "Hint: Check the path and try again.",
        )
        .into()),
        Err(err) => Err(anyhow::anyhow!("Failed to read {}: {}", path.display(), err)),
    }
}

/// Only the final path component of the recorded name is used.
fn default_output_path(recorded: &str) -> anyhow::Result<PathBuf> {
    Path::new(recorded)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| {
            CliError::invalid_input("Record has no usable file name; pass --out").into()
        })
}
