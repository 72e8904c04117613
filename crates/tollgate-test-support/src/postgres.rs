//! Disposable Postgres databases for integration tests.
//!
//! # Design
//! - `TOLLGATE_TEST_DATABASE_URL` points at a shared server; each fixture gets
//!   its own freshly created database on it.
//! - Without that variable, a throwaway cluster is started from the local
//!   `initdb`/`postgres`/`pg_isready` binaries.
//! - Every resource is released when the [`TestDatabase`] is dropped.

use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::str::FromStr;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow, bail};
use postgres::NoTls;
use url::Url;

/// Environment variable naming an existing server to create test databases on.
pub const TEST_DATABASE_URL_ENV: &str = "TOLLGATE_TEST_DATABASE_URL";

const READY_ATTEMPTS: usize = 30;
const READY_BACKOFF: Duration = Duration::from_millis(200);

/// Handle to a disposable Postgres database used in tests.
pub struct TestDatabase {
    connection_string: String,
    scratch: ScratchDatabase,
    cluster: Option<LocalCluster>,
}

impl TestDatabase {
    /// Connection string that can be passed to `sqlx` or other Postgres clients.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let _ = run_admin_statement(
            &self.scratch.admin_url,
            format!("DROP DATABASE IF EXISTS \"{}\"", self.scratch.name),
        );
        if let Some(cluster) = self.cluster.take() {
            cluster.shutdown();
        }
    }
}

/// Start (or attach to) Postgres and create a uniquely named database.
///
/// Callers usually skip the test when this returns an error, since neither an
/// external server nor local binaries are guaranteed on every machine.
///
/// # Errors
///
/// Returns an error if no server is reachable and none can be started.
pub fn start_postgres() -> Result<TestDatabase> {
    if let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) {
        let (connection_string, scratch) = create_scratch_database(&url)?;
        return Ok(TestDatabase {
            connection_string,
            scratch,
            cluster: None,
        });
    }

    let cluster = LocalCluster::start()?;
    let created = create_scratch_database(&cluster.base_url());
    match created {
        Ok((connection_string, scratch)) => Ok(TestDatabase {
            connection_string,
            scratch,
            cluster: Some(cluster),
        }),
        Err(err) => {
            cluster.shutdown();
            Err(err)
        }
    }
}

struct ScratchDatabase {
    admin_url: String,
    name: String,
}

struct LocalCluster {
    process: Child,
    data_dir: PathBuf,
    port: u16,
}

impl LocalCluster {
    fn start() -> Result<Self> {
        let initdb = find_binary("initdb")?;
        let server = find_binary("postgres")?;
        let pg_isready = find_binary("pg_isready")?;

        let data_dir = scratch_dir()?;
        let data_arg = data_dir
            .to_str()
            .context("data dir contains non-utf8 characters")?
            .to_string();

        let status = Command::new(&initdb)
            .args(["-D", &data_arg, "--username=postgres", "--auth=trust"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("failed to run initdb")?;
        if !status.success() {
            let _ = fs::remove_dir_all(&data_dir);
            bail!("initdb exited with failure status");
        }

        let port = free_port()?;
        let process = Command::new(&server)
            .args(["-D", &data_arg, "-p", &port.to_string(), "-h", "127.0.0.1"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start postgres process")?;

        let cluster = Self {
            process,
            data_dir,
            port,
        };
        if let Err(err) = cluster.wait_until_ready(&pg_isready) {
            cluster.shutdown();
            return Err(err);
        }
        Ok(cluster)
    }

    fn base_url(&self) -> String {
        format!("postgres://postgres@127.0.0.1:{}/postgres", self.port)
    }

    fn wait_until_ready(&self, pg_isready: &Path) -> Result<()> {
        let port = self.port.to_string();
        for _ in 0..READY_ATTEMPTS {
            let ready = Command::new(pg_isready)
                .args(["-h", "127.0.0.1", "-p", &port, "-U", "postgres"])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok_and(|status| status.success());
            if ready {
                return Ok(());
            }
            thread::sleep(READY_BACKOFF);
        }
        bail!("postgres process did not become ready in time")
    }

    fn shutdown(mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
        let _ = fs::remove_dir_all(&self.data_dir);
    }
}

fn find_binary(name: &str) -> Result<PathBuf> {
    // Full server installs first so `initdb` finds its share files.
    let preferred = [
        PathBuf::from("/opt/homebrew/opt/postgresql@16/bin"),
        PathBuf::from("/usr/local/opt/postgresql@16/bin"),
    ];
    let from_path = std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .unwrap_or_default();

    preferred
        .into_iter()
        .chain(from_path)
        .chain([PathBuf::from("/usr/local/bin"), PathBuf::from("/usr/lib/postgresql/16/bin")])
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.exists())
        .ok_or_else(|| anyhow!("{name} binary is required for Postgres tests"))
}

fn free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to reserve port")?;
    let port = listener
        .local_addr()
        .context("failed to read listener address")?
        .port();
    drop(listener);
    Ok(port)
}

fn scratch_dir() -> Result<PathBuf> {
    let base = std::env::temp_dir().join("tollgate-postgres");
    fs::create_dir_all(&base)
        .with_context(|| format!("failed to create base dir {}", base.display()))?;
    let candidate = base.join(unique_suffix());
    fs::create_dir_all(&candidate)
        .with_context(|| format!("failed to create data dir {}", candidate.display()))?;
    Ok(candidate)
}

fn create_scratch_database(base_url: &str) -> Result<(String, ScratchDatabase)> {
    let parsed = Url::parse(base_url).context("invalid postgres connection url")?;
    let name = format!("tollgate_test_{}", unique_suffix());

    let mut target = parsed.clone();
    target.set_path(&format!("/{name}"));

    let mut admin = parsed.clone();
    admin.set_path("/postgres");
    // Fall back to the supplied database when `postgres` is not reachable.
    let mut candidates = vec![admin.to_string()];
    if admin.path() != parsed.path() {
        candidates.push(parsed.to_string());
    }

    let mut last_error = None;
    for admin_url in candidates {
        match run_admin_statement(&admin_url, format!("CREATE DATABASE \"{name}\"")) {
            Ok(()) => {
                return Ok((
                    target.to_string(),
                    ScratchDatabase {
                        admin_url,
                        name,
                    },
                ));
            }
            Err(err) => last_error = Some(err),
        }
    }
    Err(last_error.unwrap_or_else(|| anyhow!("failed to create database")))
}

/// Run a single statement on a dedicated thread; the sync client must not block an async runtime.
fn run_admin_statement(admin_url: &str, statement: String) -> Result<()> {
    let admin_url = admin_url.to_string();
    thread::spawn(move || -> Result<()> {
        let config = postgres::Config::from_str(&admin_url)?;
        let mut client = config.connect(NoTls)?;
        client
            .simple_query(&statement)
            .map(|_| ())
            .with_context(|| format!("failed to execute `{statement}`"))
    })
    .join()
    .unwrap_or_else(|_| Err(anyhow!("admin statement thread panicked")))
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{}_{nanos}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_suffix_embeds_process_id() {
        let suffix = unique_suffix();
        assert!(suffix.starts_with(&std::process::id().to_string()));
    }

    #[test]
    fn missing_binaries_are_reported_by_name() {
        let err = find_binary("definitely-not-a-postgres-binary").unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-postgres-binary"));
    }
}
