use std::{fs, process::Command};

fn sinplot() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sinplot"))
}

#[test]
fn writes_figures_sin_pdf() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::create_dir(dir.path().join("figures"))?;
    let status = sinplot().current_dir(dir.path()).status()?;
    assert!(status.success());
    let pdf = fs::read(dir.path().join("figures/sin.pdf"))?;
    assert!(pdf.starts_with(b"%PDF-"));
    // A second run replaces the file.
    let status = sinplot().current_dir(dir.path()).status()?;
    assert!(status.success());
    assert!(fs::metadata(dir.path().join("figures/sin.pdf"))?.len() > 0);
    Ok(())
}

#[test]
fn fails_without_figures_directory() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let out = sinplot().current_dir(dir.path()).output()?;
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No such file or directory"), "{}", stderr);
    assert!(stderr.contains("figures/sin.pdf"), "{}", stderr);
    assert!(!dir.path().join("figures").exists());
    Ok(())
}
