//! `tiapp show`: load the config file and print its document.

use anyhow::{Context, Result, bail};

use crate::cli::{Cli, ShowArgs};
use tiapp::{Document, TiApp, log};

pub fn run(cli: &Cli, args: &ShowArgs) -> Result<()> {
    let options = cli.load_options();

    let mut tiapp = TiApp::with_options(args.path.as_deref(), options.clone())
        .with_context(|| format!("failed to load {}", options.file_name))?;

    // Discovery found nothing: ask for a load so the error names what was tried.
    if tiapp.document().is_none() {
        tiapp
            .load(None)
            .with_context(|| format!("failed to load {}", options.file_name))?;
    }

    let Some(document) = tiapp.document() else {
        bail!("{} has no document", options.file_name);
    };

    report_issues(&tiapp, document);
    println!("{}", render(document, args)?);
    Ok(())
}

fn render(document: &Document, args: &ShowArgs) -> Result<String> {
    if !args.json {
        return Ok(document.to_string());
    }
    let output = if args.pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(output)
}

fn report_issues(tiapp: &TiApp, document: &Document) {
    if !document.has_issues() {
        return;
    }

    let path = tiapp
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    log!("warning"; "malformed XML tolerated in {}:", path);
    for issue in &document.issues {
        eprintln!("- byte {}: {}", issue.position, issue.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(json: bool, pretty: bool) -> ShowArgs {
        ShowArgs {
            path: None::<PathBuf>,
            json,
            pretty,
        }
    }

    #[test]
    fn test_render_xml_and_json() {
        let document =
            tiapp::xml::parse("<ti:app><id>x</id></ti:app>", Default::default()).unwrap();

        assert_eq!(
            render(&document, &args(false, false)).unwrap(),
            "<ti:app><id>x</id></ti:app>"
        );

        let json: serde_json::Value =
            serde_json::from_str(&render(&document, &args(true, false)).unwrap()).unwrap();
        assert_eq!(json["nodes"][0]["value"]["name"], "ti:app");

        let pretty = render(&document, &args(true, true)).unwrap();
        assert!(pretty.contains('\n'));
    }
}
