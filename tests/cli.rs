use clap::Parser;
use std::path::Path;
use tempfile::tempdir;
use parquet_viewer::cli::{self, Cli, Commands};
use parquet_viewer::loader::{LoadOptions, read_table};
use parquet_viewer::schema::SchemaDocument;

fn parse(args: &[&str]) -> anyhow::Result<Commands> {
    let cli = Cli::try_parse_from(std::iter::once("parquet-viewer").chain(args.iter().copied()))?;
    cli.command.ok_or_else(|| anyhow::anyhow!("no subcommand"))
}

fn run(args: &[&str]) -> anyhow::Result<()> {
    cli::run(parse(args)?)
}

fn write_csv(path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, "id,name,score\n1,a,0.5\n2,b,1.5\n3,c,2.5\n4,d,3.5\n")?;
    Ok(())
}

#[test]
fn no_subcommand_means_gui() -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(["parquet-viewer"])?;
    assert!(cli.command.is_none());
    Ok(())
}

#[test]
fn show_and_info_read_the_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.csv");
    write_csv(&input)?;
    let input = input.to_string_lossy().into_owned();
    run(&["show", &input, "--rows", "2"])?;
    run(&["show", &input, "--filter", "c"])?;
    run(&["info", &input])?;
    assert!(run(&["info", "missing.csv"]).is_err());
    assert!(run(&["show", &input, "--separator", "é"]).is_err());
    Ok(())
}

#[test]
fn export_subcommand_writes_sample() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.csv");
    write_csv(&input)?;
    let output = dir.path().join("out.parquet");
    run(&[
        "export",
        &input.to_string_lossy(),
        &output.to_string_lossy(),
        "--mode",
        "head",
        "--rows",
        "3",
        "--exclude",
        "name,score",
    ])?;
    let back = read_table(&output, &LoadOptions::default())?;
    assert_eq!(back.shape(), (3, 1));

    // Asking for more rows than exist fails.
    let too_many = dir.path().join("too_many.csv");
    assert!(
        run(&[
            "export",
            &input.to_string_lossy(),
            &too_many.to_string_lossy(),
            "--mode",
            "random",
            "--rows",
            "50",
        ])
        .is_err()
    );
    Ok(())
}

#[test]
fn schema_then_diff() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let first = dir.path().join("first.csv");
    write_csv(&first)?;
    let second = dir.path().join("second.csv");
    std::fs::write(&second, "id,name,extra\n1,a,x\n")?;

    let left = dir.path().join("left.json");
    let right = dir.path().join("right.json");
    let excel = dir.path().join("left.xlsx");
    run(&[
        "schema",
        &first.to_string_lossy(),
        "--json",
        &left.to_string_lossy(),
        "--excel",
        &excel.to_string_lossy(),
    ])?;
    run(&["schema", &second.to_string_lossy(), "--json", &right.to_string_lossy()])?;
    assert!(excel.exists());

    let doc = SchemaDocument::read_json(&left)?;
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.entries()[0].source.as_deref(), Some("first.csv"));

    run(&["diff", &left.to_string_lossy(), &left.to_string_lossy()])?;
    assert!(run(&["diff", &left.to_string_lossy(), &right.to_string_lossy()]).is_err());
    Ok(())
}
