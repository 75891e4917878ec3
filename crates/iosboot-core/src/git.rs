//! Version control: repository, pre-commit hook, initial commit, publishing

use crate::config::ProjectConfig;
use crate::prompt::Prompter;
use crate::runtime::tool::{GH, GIT};
use crate::runtime::ToolInvoker;
use crate::templates::manifest::PRE_COMMIT_HOOK;
use crate::templates::{render_templates, RenderOutcome, TemplateDescriptor, TemplateSource};
use crate::ui;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const HOOK_DESTINATION: &str = ".git/hooks/pre-commit";
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Initialize a repository unless the directory already has its own `.git`
///
/// A directory nested inside another work tree still gets its own
/// repository, so its hooks and commits stay separate from the parent's.
/// Returns `true` when a repository was created.
pub fn ensure_repository(invoker: &ToolInvoker<'_>) -> Result<bool> {
    if invoker.cwd().join(".git").exists() {
        ui::info("Git repository already initialized");
        return Ok(false);
    }

    let toplevel = invoker.probe(&GIT, &["rev-parse", "--show-toplevel"])?;
    if toplevel.success() && !toplevel.stdout.trim().is_empty() {
        ui::info(format!(
            "Inside the work tree of {}, initializing a separate repository",
            toplevel.stdout.trim()
        ));
    }

    invoker.run(&GIT, &["init"], "Initialized git repository")?;
    Ok(true)
}

/// Where git reads the pre-commit hook from, relative to the working directory
///
/// Honors `core.hooksPath` and linked work trees; falls back to
/// [`HOOK_DESTINATION`] when git cannot answer.
pub fn hook_path(invoker: &ToolInvoker<'_>) -> PathBuf {
    match invoker.probe(&GIT, &["rev-parse", "--git-path", "hooks/pre-commit"]) {
        Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
            PathBuf::from(output.stdout.trim())
        }
        _ => PathBuf::from(HOOK_DESTINATION),
    }
}

/// Render the pre-commit hook where git looks for it and make it executable
pub fn install_pre_commit_hook(
    invoker: &ToolInvoker<'_>,
    source: &TemplateSource,
    config: &ProjectConfig,
    prompter: &mut dyn Prompter,
) -> Result<RenderOutcome> {
    let root = invoker.cwd();
    let destination = hook_path(invoker);
    tracing::debug!(path = %destination.display(), "pre-commit hook destination");

    let descriptor =
        TemplateDescriptor::new(PRE_COMMIT_HOOK, destination.to_string_lossy().into_owned());
    let report = render_templates(root, source, &[descriptor], config, prompter)?;
    let outcome = report
        .first()
        .map(|r| r.outcome)
        .unwrap_or(RenderOutcome::Missing);

    if outcome == RenderOutcome::Written {
        set_executable(&root.join(&destination))?;
        ui::success("Installed pre-commit hook");
    }
    Ok(outcome)
}

fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(path)
            .with_context(|| format!("Failed to read metadata: {}", path.display()))?
            .permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to set permissions: {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Stage everything and commit, unless the repository already has a HEAD
///
/// Returns `true` when a commit was created.
pub fn initial_commit(invoker: &ToolInvoker<'_>) -> Result<bool> {
    let head = invoker.probe(&GIT, &["rev-parse", "--verify", "HEAD"])?;
    if head.success() {
        ui::info("Repository already has commits, skipping initial commit");
        return Ok(false);
    }

    invoker.capture(&GIT, &["add", "-A"])?;
    invoker.run(
        &GIT,
        &["commit", "-m", INITIAL_COMMIT_MESSAGE],
        "Created initial commit",
    )?;
    Ok(true)
}

/// Create the GitHub repository from the working copy and push
pub fn publish(invoker: &ToolInvoker<'_>, config: &ProjectConfig) -> Result<()> {
    invoker.require(&GH)?;
    invoker.run(
        &GH,
        &[
            "repo",
            "create",
            config.project_name.as_str(),
            config.visibility.gh_flag(),
            "--source",
            ".",
            "--push",
        ],
        &format!(
            "Published {} repository {}",
            config.visibility.as_str(),
            config.project_name
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::sample_config;
    use crate::prompt::AutoPrompter;
    use crate::runtime::testing::FakeRunner;
    use crate::runtime::{CommandOutput, CommandRunner, SystemRunner};

    #[test]
    fn test_existing_repository_is_reused() {
        let project = tempfile::tempdir().unwrap();
        std::fs::create_dir(project.path().join(".git")).unwrap();
        let runner = FakeRunner::with_tools(&["git"]);
        let invoker = ToolInvoker::new(&runner, project.path());

        assert!(!ensure_repository(&invoker).unwrap());
        assert_eq!(runner.count(&["git", "init"]), 0);
    }

    #[test]
    fn test_nested_directory_gets_its_own_repository() {
        let parent = tempfile::tempdir().unwrap();
        std::fs::create_dir(parent.path().join(".git")).unwrap();
        let project = parent.path().join("DemoApp");
        std::fs::create_dir(&project).unwrap();

        let runner = FakeRunner::with_tools(&["git"]);
        runner.respond(
            &["git", "rev-parse", "--show-toplevel"],
            CommandOutput::ok(format!("{}\n", parent.path().display())),
        );
        let invoker = ToolInvoker::new(&runner, &project);

        assert!(ensure_repository(&invoker).unwrap());
        assert_eq!(runner.count(&["git", "init"]), 1);
    }

    #[test]
    fn test_repository_is_created() {
        let runner = FakeRunner::with_tools(&["git"]);
        runner.respond(
            &["git", "rev-parse"],
            CommandOutput::failed(128, "fatal: not a git repository"),
        );
        let invoker = ToolInvoker::new(&runner, Path::new("/work"));

        assert!(ensure_repository(&invoker).unwrap());
        assert_eq!(runner.count(&["git", "init"]), 1);
    }

    #[test]
    fn test_initial_commit_skipped_with_head() {
        let runner = FakeRunner::with_tools(&["git"]);
        runner.respond(&["git", "rev-parse", "--verify", "HEAD"], CommandOutput::ok("abc123\n"));
        let invoker = ToolInvoker::new(&runner, Path::new("/work"));

        assert!(!initial_commit(&invoker).unwrap());
        assert_eq!(runner.count(&["git", "commit"]), 0);
    }

    #[test]
    fn test_initial_commit_stages_and_commits() {
        let runner = FakeRunner::with_tools(&["git"]);
        runner.respond(&["git", "rev-parse"], CommandOutput::failed(128, "unknown revision"));
        let invoker = ToolInvoker::new(&runner, Path::new("/work"));

        assert!(initial_commit(&invoker).unwrap());
        let calls: Vec<String> = runner.calls().iter().map(|c| c.display()).collect();
        assert_eq!(
            calls,
            vec![
                "git rev-parse --verify HEAD",
                "git add -A",
                "git commit -m Initial commit",
            ]
        );
    }

    #[test]
    fn test_publish_uses_visibility() {
        let runner = FakeRunner::with_tools(&["gh"]);
        let invoker = ToolInvoker::new(&runner, Path::new("/work"));
        let config = sample_config();

        publish(&invoker, &config).unwrap();
        assert_eq!(
            runner.count(&["gh", "repo", "create", "DemoApp", "--public", "--source", ".", "--push"]),
            1
        );
    }

    #[test]
    fn test_publish_requires_gh() {
        let runner = FakeRunner::with_tools(&["git"]);
        let invoker = ToolInvoker::new(&runner, Path::new("/work"));
        assert!(publish(&invoker, &sample_config()).is_err());
    }

    #[test]
    fn test_hook_is_rendered_and_executable() {
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner::with_tools(&["git"]);
        let invoker = ToolInvoker::new(&runner, project.path());
        let config = sample_config();

        let outcome =
            install_pre_commit_hook(&invoker, &TemplateSource::Embedded, &config, &mut AutoPrompter)
                .unwrap();
        assert_eq!(outcome, RenderOutcome::Written);

        let path = project.path().join(".git/hooks/pre-commit");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("swift-format lint --strict --recursive DemoApp"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_hook_follows_git_path() {
        let project = tempfile::tempdir().unwrap();
        let runner = FakeRunner::with_tools(&["git"]);
        runner.respond(
            &["git", "rev-parse", "--git-path", "hooks/pre-commit"],
            CommandOutput::ok("githooks/pre-commit\n"),
        );
        let invoker = ToolInvoker::new(&runner, project.path());

        let outcome =
            install_pre_commit_hook(&invoker, &TemplateSource::Embedded, &sample_config(), &mut AutoPrompter)
                .unwrap();
        assert_eq!(outcome, RenderOutcome::Written);
        assert!(project.path().join("githooks/pre-commit").is_file());
        assert!(!project.path().join(".git").exists());
    }

    #[test]
    fn test_nested_project_hook_is_active_with_real_git() {
        let runner = SystemRunner;
        if !runner.is_installed("git") {
            return;
        }
        let parent = tempfile::tempdir().unwrap();
        ToolInvoker::new(&runner, parent.path())
            .capture(&GIT, &["init", "--quiet"])
            .unwrap();
        let project = parent.path().join("DemoApp");
        std::fs::create_dir(&project).unwrap();
        let invoker = ToolInvoker::new(&runner, &project);

        assert!(ensure_repository(&invoker).unwrap());
        install_pre_commit_hook(&invoker, &TemplateSource::Embedded, &sample_config(), &mut AutoPrompter)
            .unwrap();

        let active = invoker
            .capture(&GIT, &["rev-parse", "--git-path", "hooks/pre-commit"])
            .unwrap();
        let active = project.join(active.stdout.trim());
        assert!(active.is_file());
        assert!(!parent.path().join(".git/hooks/pre-commit").exists());
    }
}
