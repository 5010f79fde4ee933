use std::process::{Child, Command, Stdio};
use std::thread;

pub enum LaunchResult {
    Spawned { program: String, pid: u32 },
    Failed(String),
    NotConfigured,
}

/// Expands `template` by replacing `placeholder` with `value` in every
/// whitespace-separated word.
pub fn expand_template(template: &str, placeholder: &str, value: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|word| word.replace(placeholder, value))
        .collect()
}

/// Starts the configured tool without waiting for it.
pub fn spawn_detached(template: &str, placeholder: &str, value: &str) -> LaunchResult {
    let argv = expand_template(template, placeholder, value);
    let Some((program, args)) = argv.split_first() else {
        return LaunchResult::NotConfigured;
    };

    match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => {
            let pid = child.id();
            tracing::info!(program = %program, pid, "launched external tool");
            reap_in_background(child, program);
            LaunchResult::Spawned {
                program: program.clone(),
                pid,
            }
        }
        Err(err) => {
            tracing::warn!(program = %program, error = %err, "failed to launch external tool");
            LaunchResult::Failed(format!("Failed to run {program}: {err}"))
        }
    }
}

/// Waits for `child` on its own thread so a finished tool never lingers as
/// a zombie while the dashboard keeps running.
fn reap_in_background(mut child: Child, program: &str) {
    let spawned = thread::Builder::new()
        .name("launch-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(pid = child.id(), %status, "external tool exited"),
            Err(err) => tracing::warn!(pid = child.id(), error = %err, "failed to wait for external tool"),
        });
    if let Err(err) = spawned {
        tracing::warn!(program = %program, error = %err, "failed to start reaper thread");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_placeholder_in_every_word() {
        let argv = expand_template("witr --pid {pid} --tag=p{pid}", "{pid}", "42");
        assert_eq!(argv, vec!["witr", "--pid", "42", "--tag=p42"]);
    }

    #[test]
    fn empty_template_is_not_configured() {
        assert!(matches!(
            spawn_detached("   ", "{pid}", "1"),
            LaunchResult::NotConfigured
        ));
    }

    #[cfg(unix)]
    #[test]
    fn finished_tool_is_reaped() {
        use std::path::Path;
        use std::time::{Duration, Instant};

        let pid = match spawn_detached("true {pid}", "{pid}", "1") {
            LaunchResult::Spawned { program, pid } => {
                assert_eq!(program, "true");
                pid
            }
            _ => panic!("expected `true` to launch"),
        };

        let proc_entry = Path::new("/proc").join(pid.to_string());
        let deadline = Instant::now() + Duration::from_secs(5);
        while proc_entry.exists() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert!(!proc_entry.exists(), "pid {pid} was left as a zombie");
    }

    #[test]
    fn missing_program_reports_failure() {
        match spawn_detached("pulsetop-no-such-tool-xyz {addr}", "{addr}", "1.2.3.4:443") {
            LaunchResult::Failed(msg) => assert!(msg.contains("pulsetop-no-such-tool-xyz")),
            _ => panic!("expected launch failure"),
        }
    }
}
