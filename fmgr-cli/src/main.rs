use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;

use fmgr_client::LocalClient;
use fmgr_core::case::to_schema_name;
use fmgr_core::convert::{ApiObject, FlattenOptions, expand, flatten, value_to_json};
use fmgr_core::provider::Provider;
use fmgr_core::resource::{ResourceData, Value};
use fmgr_core::schema::{AttributeSchema, AttributeType, ResourceSchema};
use fmgr_provider::{FmgrProvider, ProviderConfig};
use fmgr_state::{LocalBackend, LockInfo, ResourceState, StateBackend, StateFile};

mod manifest;
mod plan;

use manifest::{DEFAULT_MANIFEST_FILE, Manifest, desired_attributes};
use plan::{Effect, create_plan, format_value, print_plan};

#[derive(Parser)]
#[command(name = "fmgr")]
#[command(about = "Manage device configuration objects through the management API", long_about = None)]
struct Cli {
    /// Device object store standing in for the management API
    #[arg(long, global = true, default_value = LocalClient::DEFAULT_STORE_FILE)]
    store: PathBuf,

    /// State file recording managed resources
    #[arg(long, global = true, default_value = LocalBackend::DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Provider configuration file (takes precedence over the manifest's provider section)
    #[arg(long, global = true)]
    provider_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resource types, or show the attributes of one
    Schema { resource_type: Option<String> },
    /// Render resource attributes (JSON file) as the API object sent to the device
    Expand {
        resource_type: String,
        file: PathBuf,
    },
    /// Render an API object (JSON file) as resource attributes
    Flatten {
        resource_type: String,
        file: PathBuf,

        /// Sort table rows by their key
        #[arg(long)]
        sort_subtables: bool,
    },
    /// Validate the manifest
    Validate {
        #[arg(default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,
    },
    /// Show execution plan without applying changes
    Plan {
        #[arg(default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,
    },
    /// Apply changes to reach the desired state
    Apply {
        #[arg(default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long)]
        auto_approve: bool,
    },
    /// Delete every managed resource
    Destroy {
        #[arg(default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(long)]
        auto_approve: bool,
    },
    /// Refresh a managed resource and print its attributes
    Read {
        resource_type: String,
        name: String,

        #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,
    },
    /// Bring an existing remote object under management
    Import {
        resource_type: String,
        /// Local name to record the resource under
        name: String,
        /// Import id: parent keys and the object key joined by '/'
        id: String,

        #[arg(long, default_value = DEFAULT_MANIFEST_FILE)]
        file: PathBuf,
    },
    /// Release a stale state lock
    ForceUnlock { lock_id: String },
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Schema { resource_type } => run_schema(resource_type.as_deref()),
        Commands::Expand {
            resource_type,
            file,
        } => run_expand(resource_type, file),
        Commands::Flatten {
            resource_type,
            file,
            sort_subtables,
        } => run_flatten(resource_type, file, *sort_subtables),
        Commands::Validate { file } => run_validate(file),
        Commands::Plan { file } => run_plan(&cli, file).await,
        Commands::Apply { file, auto_approve } => run_apply(&cli, file, *auto_approve).await,
        Commands::Destroy { file, auto_approve } => run_destroy(&cli, file, *auto_approve).await,
        Commands::Read {
            resource_type,
            name,
            file,
        } => run_read(&cli, file, resource_type, name).await,
        Commands::Import {
            resource_type,
            name,
            id,
            file,
        } => run_import(&cli, file, resource_type, name, id).await,
        Commands::ForceUnlock { lock_id } => run_force_unlock(&cli, lock_id).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

// =============================================================================
// Setup
// =============================================================================

/// Provider configuration: `--provider-config`, else the manifest's
/// provider section, else defaults; `FMGR_*` variables apply on top
fn provider_config(cli: &Cli, manifest: Option<&Manifest>) -> Result<ProviderConfig> {
    if let Some(path) = &cli.provider_config {
        return Ok(ProviderConfig::load(path)?);
    }
    let config = manifest
        .and_then(|m| m.provider.clone())
        .unwrap_or_default();
    Ok(config.with_env())
}

fn build_provider(cli: &Cli, manifest: Option<&Manifest>) -> Result<FmgrProvider<LocalClient>> {
    let config = provider_config(cli, manifest)?;
    log::debug!(
        "provider config: adom={} device={:?} vdom={}",
        config.adom,
        config.device_name,
        config.device_vdom
    );
    Ok(FmgrProvider::new(
        LocalClient::with_path(cli.store.clone()),
        config,
    ))
}

/// Manifest when present; commands addressing a single resource work without one
fn load_optional_manifest(path: &Path) -> Result<Option<Manifest>> {
    if path.exists() {
        Manifest::load(path).map(Some)
    } else {
        Ok(None)
    }
}

fn schema_for<'a>(provider: &'a dyn Provider, resource_type: &str) -> Result<&'a ResourceSchema> {
    provider
        .schema(resource_type)
        .ok_or_else(|| anyhow!("Unknown resource type: {}", resource_type))
}

fn read_json_object(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match serde_json::from_str::<serde_json::Value>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?
    {
        serde_json::Value::Object(obj) => Ok(obj),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} ", prompt.bold());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim() == "yes")
}

async fn save_state(backend: &LocalBackend, state: &mut StateFile) -> Result<()> {
    state.increment_serial();
    backend
        .write_state(state)
        .await
        .context("Failed to write state")
}

/// Run `operation` holding the state lock
async fn with_lock<T>(
    backend: &LocalBackend,
    lock: LockInfo,
    operation: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    let lock = backend.acquire_lock(lock).await?;
    let result = operation.await;
    if let Err(e) = backend.release_lock(&lock).await {
        log::warn!("failed to release state lock {}: {}", lock.id, e);
    }
    result
}

// =============================================================================
// Schema inspection
// =============================================================================

fn run_schema(resource_type: Option<&str>) -> Result<()> {
    let provider = FmgrProvider::new(LocalClient::new(), ProviderConfig::default());

    let Some(resource_type) = resource_type else {
        println!("{}", "Resource types:".cyan().bold());
        for definition in provider.definitions() {
            let kind = if definition.is_singleton() {
                "singleton"
            } else {
                "table"
            };
            println!(
                "  {} ({}, {})",
                definition.type_name.bold(),
                definition.endpoint.path,
                kind
            );
        }
        return Ok(());
    };

    let definition = provider.definition(resource_type)?;
    println!("{}", definition.type_name.cyan().bold());
    if let Some(description) = &definition.schema.description {
        println!("  {}", description);
    }
    println!("  path: {}", definition.endpoint.path);
    if let Some(mkey) = definition.mkey {
        println!("  key:  {}", mkey);
    }
    println!();
    for attr in definition.schema.attributes.values() {
        print_attribute(attr, 1);
    }
    Ok(())
}

fn print_attribute(attr: &AttributeSchema, depth: usize) {
    let indent = "  ".repeat(depth);
    let mut flags = Vec::new();
    if attr.required {
        flags.push("required");
    }
    if attr.optional {
        flags.push("optional");
    }
    if attr.computed {
        flags.push("computed");
    }
    if attr.sensitive {
        flags.push("sensitive");
    }
    if attr.local_only {
        flags.push("local");
    }

    let mut line = format!(
        "{}{} ({}) [{}]",
        indent,
        attr.name.bold(),
        attr.attr_type.type_name(),
        flags.join(", ")
    );
    if let Some(default) = &attr.default {
        line.push_str(&format!(" = {}", format_value(default)));
    }
    println!("{}", line);

    if let AttributeType::Block(block) | AttributeType::Table(block) = &attr.attr_type {
        for nested in block.attributes.values() {
            print_attribute(nested, depth + 1);
        }
    }
}

fn run_expand(resource_type: &str, file: &Path) -> Result<()> {
    let provider = FmgrProvider::new(LocalClient::new(), ProviderConfig::default());
    let schema = schema_for(&provider, resource_type)?;

    let attributes = desired_attributes(schema, &read_json_object(file)?)?;
    let obj = expand(&schema.attributes, &attributes, &HashMap::new())?;
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn run_flatten(resource_type: &str, file: &Path, sort_subtables: bool) -> Result<()> {
    let provider = FmgrProvider::new(LocalClient::new(), ProviderConfig::default());
    let schema = schema_for(&provider, resource_type)?;

    let obj: ApiObject = read_json_object(file)?;
    for key in unknown_api_keys(schema, &obj) {
        log::warn!("ignoring '{}': not an attribute of {}", key, resource_type);
    }
    let mut attributes = HashMap::new();
    flatten(
        &schema.attributes,
        &obj,
        &mut attributes,
        FlattenOptions { sort_subtables },
    )?;
    println!("{}", serde_json::to_string_pretty(&attributes_to_json(&attributes))?);
    Ok(())
}

/// API keys that map to no attribute of the schema
fn unknown_api_keys(schema: &ResourceSchema, obj: &ApiObject) -> Vec<String> {
    obj.keys()
        .filter(|key| schema.get(&to_schema_name(key)).is_none())
        .cloned()
        .collect()
}

fn attributes_to_json(attributes: &HashMap<String, Value>) -> serde_json::Value {
    let obj: serde_json::Map<String, serde_json::Value> = attributes
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    serde_json::Value::Object(obj)
}

// =============================================================================
// Manifest commands
// =============================================================================

fn run_validate(file: &Path) -> Result<()> {
    let manifest = Manifest::load(file)?;
    let provider = FmgrProvider::new(LocalClient::new(), ProviderConfig::default());

    for block in &manifest.resources {
        let schema = schema_for(&provider, &block.resource_type)?;
        block.desired(schema)?;
    }

    println!(
        "{}",
        format!(
            "Manifest is valid ({} resources).",
            manifest.resources.len()
        )
        .green()
    );
    Ok(())
}

async fn run_plan(cli: &Cli, file: &Path) -> Result<()> {
    let manifest = Manifest::load(file)?;
    let provider = build_provider(cli, Some(&manifest))?;
    let backend = LocalBackend::with_path(cli.state.clone());
    let state = backend.read_state().await?.unwrap_or_default();

    let plan = create_plan(&provider, &manifest, &state).await?;
    print_plan(&plan, &provider);
    Ok(())
}

async fn run_apply(cli: &Cli, file: &Path, auto_approve: bool) -> Result<()> {
    let manifest = Manifest::load(file)?;
    let provider = build_provider(cli, Some(&manifest))?;
    let backend = LocalBackend::with_path(cli.state.clone());

    with_lock(&backend, LockInfo::new("apply"), async {
        let mut state = backend.read_state().await?.unwrap_or_default();
        let plan = create_plan(&provider, &manifest, &state).await?;
        print_plan(&plan, &provider);

        if plan.mutation_count() > 0
            && !auto_approve
            && !confirm("Do you want to apply these changes? Type 'yes' to confirm:")?
        {
            println!("{}", "Apply cancelled.".yellow());
            return Ok(());
        }
        if plan.mutation_count() > 0 {
            println!();
            println!("{}", "Applying changes...".cyan().bold());
        }

        let mut failures = 0;
        for effect in plan.into_effects() {
            let address = effect.address();
            match apply_effect(&provider, &mut state, effect).await {
                Ok(Some(action)) => println!("  {} {} {}", "✓".green(), action, address),
                Ok(None) => {}
                Err(e) => {
                    failures += 1;
                    println!("  {} {}: {:#}", "✗".red(), address, e);
                }
            }
        }

        save_state(&backend, &mut state).await?;

        if failures > 0 {
            bail!("Apply failed: {} error(s)", failures);
        }
        println!();
        println!("{}", "Apply complete!".green().bold());
        Ok(())
    })
    .await
}

/// Execute one effect and record the outcome in the state
async fn apply_effect(
    provider: &dyn Provider,
    state: &mut StateFile,
    effect: Effect,
) -> Result<Option<&'static str>> {
    let provider_name = provider.name();
    match effect {
        Effect::Read { name, data } => {
            state.upsert_resource(ResourceState::from_data(name, provider_name, &data));
            Ok(None)
        }
        Effect::Create { name, data } => {
            let created = provider.create(data).await?;
            state.upsert_resource(ResourceState::from_data(name, provider_name, &created));
            Ok(Some("Created"))
        }
        Effect::Update { name, to, .. } => {
            let updated = provider.update(to).await?;
            state.upsert_resource(ResourceState::from_data(name, provider_name, &updated));
            Ok(Some("Updated"))
        }
        Effect::Delete { name, data } => {
            let resource_type = data.resource_type.clone();
            provider.delete(data).await?;
            state.remove_resource(&resource_type, &name);
            Ok(Some("Deleted"))
        }
    }
}

async fn run_destroy(cli: &Cli, file: &Path, auto_approve: bool) -> Result<()> {
    let manifest = load_optional_manifest(file)?;
    let provider = build_provider(cli, manifest.as_ref())?;
    let backend = LocalBackend::with_path(cli.state.clone());

    with_lock(&backend, LockInfo::new("destroy"), async {
        let Some(mut state) = backend.read_state().await? else {
            println!("{}", "No resources to destroy.".yellow());
            return Ok(());
        };
        if state.resources.is_empty() {
            println!("{}", "No resources to destroy.".yellow());
            return Ok(());
        }

        println!("{}", "The following resources will be destroyed:".red().bold());
        for recorded in state.resources.iter().rev() {
            println!(
                "  {} {}.{} ({})",
                "-".red().bold(),
                recorded.resource_type,
                recorded.name,
                recorded.id
            );
        }
        println!();

        if !auto_approve && !confirm("Do you really want to destroy all resources? Type 'yes' to confirm:")? {
            println!("{}", "Destroy cancelled.".yellow());
            return Ok(());
        }

        let mut failures = 0;
        let recorded: Vec<ResourceState> = state.resources.iter().rev().cloned().collect();
        for resource in recorded {
            let address = format!("{}.{}", resource.resource_type, resource.name);
            match provider.delete(resource.to_data()).await {
                Ok(_) => {
                    state.remove_resource(&resource.resource_type, &resource.name);
                    println!("  {} Deleted {}", "✓".green(), address);
                }
                Err(e) => {
                    failures += 1;
                    println!("  {} {}: {}", "✗".red(), address, e);
                }
            }
        }

        save_state(&backend, &mut state).await?;

        if failures > 0 {
            bail!("Destroy failed: {} error(s)", failures);
        }
        println!();
        println!("{}", "Destroy complete!".green().bold());
        Ok(())
    })
    .await
}

// =============================================================================
// Single resource commands
// =============================================================================

async fn run_read(cli: &Cli, file: &Path, resource_type: &str, name: &str) -> Result<()> {
    let manifest = load_optional_manifest(file)?;
    let provider = build_provider(cli, manifest.as_ref())?;
    let backend = LocalBackend::with_path(cli.state.clone());

    let lock = LockInfo::new("read").for_resource(format!("{}.{}", resource_type, name));
    with_lock(&backend, lock, async {
        let mut state = backend.read_state().await?.unwrap_or_default();
        let recorded = state
            .find_resource(resource_type, name)
            .ok_or_else(|| anyhow!("{}.{} is not managed", resource_type, name))?;

        let refreshed: ResourceData = provider.read(recorded.to_data()).await?;
        if !refreshed.has_id() {
            state.remove_resource(resource_type, name);
            save_state(&backend, &mut state).await?;
            bail!(
                "{}.{} no longer exists on the device and was removed from the state",
                resource_type,
                name
            );
        }

        print_resource(&provider, &refreshed);
        state.upsert_resource(ResourceState::from_data(name, provider.name(), &refreshed));
        save_state(&backend, &mut state).await
    })
    .await
}

async fn run_import(
    cli: &Cli,
    file: &Path,
    resource_type: &str,
    name: &str,
    id: &str,
) -> Result<()> {
    let manifest = load_optional_manifest(file)?;
    let provider = build_provider(cli, manifest.as_ref())?;
    let backend = LocalBackend::with_path(cli.state.clone());

    let lock = LockInfo::new("import").for_resource(format!("{}.{}", resource_type, name));
    with_lock(&backend, lock, async {
        let mut state = backend.read_state().await?.unwrap_or_default();
        if let Some(existing) = state.find_resource(resource_type, name) {
            bail!(
                "{}.{} is already managed (id {})",
                resource_type,
                name,
                existing.id
            );
        }

        let imported = provider.import(resource_type, id).await?;
        if let Some(existing) = state.find_by_id(resource_type, imported.id()) {
            log::warn!(
                "{} {} is also managed as {}",
                resource_type,
                imported.id(),
                existing.name
            );
        }

        println!(
            "{} Imported {}.{} ({})",
            "✓".green(),
            resource_type,
            name,
            imported.id()
        );
        print_resource(&provider, &imported);
        state.upsert_resource(ResourceState::from_data(name, provider.name(), &imported));
        save_state(&backend, &mut state).await
    })
    .await
}

fn print_resource(provider: &dyn Provider, data: &ResourceData) {
    let schema = provider.schema(&data.resource_type);
    let mut names: Vec<&String> = data.attributes().keys().collect();
    names.sort();
    for name in names {
        let sensitive = schema
            .and_then(|s| s.get(name))
            .is_some_and(|attr| attr.sensitive);
        let value = if sensitive {
            "(sensitive)".to_string()
        } else {
            format_value(&data.attributes()[name])
        };
        println!("  {}: {}", name, value);
    }
}

async fn run_force_unlock(cli: &Cli, lock_id: &str) -> Result<()> {
    let backend = LocalBackend::with_path(cli.state.clone());
    let released = backend.force_unlock(lock_id).await?;
    println!("{}", format!("Lock {} released.", lock_id).green());
    println!("  held for {}", released);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmgr_client::{DeviceClient, Endpoint, Paradict};
    use tempfile::tempdir;

    fn cli(dir: &Path) -> Cli {
        Cli {
            store: dir.join("device.json"),
            state: dir.join("state.json"),
            provider_config: None,
            command: Commands::ForceUnlock {
                lock_id: String::new(),
            },
        }
    }

    fn write_manifest(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("fmgr.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    const MANIFEST: &str = r#"{
        "provider": { "adom": "branch", "device_name": "fgt-01" },
        "resources": [
            { "type": "object_firewall_address", "name": "lan",
              "attributes": { "name": "lan", "subnet": ["10.0.0.0", "255.255.255.0"] } },
            { "type": "system_global", "name": "global",
              "attributes": { "hostname": "fgt-01", "admintimeout": 30 } }
        ]
    }"#;

    #[tokio::test]
    async fn apply_creates_and_records_resources() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(dir.path(), MANIFEST);

        run_apply(&cli, &manifest, true).await.unwrap();

        let state = LocalBackend::with_path(cli.state.clone())
            .read_state()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.serial, 1);
        assert_eq!(
            state.find_resource("object_firewall_address", "lan").unwrap().id,
            "lan"
        );
        assert_eq!(
            state.find_resource("system_global", "global").unwrap().id,
            "SystemGlobal"
        );

        let device = LocalClient::with_path(cli.store.clone());
        let address = device
            .read(
                &Endpoint::table("/pm/config/{adom}/obj/firewall/address", "name"),
                Some("lan"),
                &Paradict::new().with("adom", "adom/branch"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(address["subnet"], serde_json::json!(["10.0.0.0", "255.255.255.0"]));

        // A second apply finds nothing to change
        let provider = build_provider(&cli, Some(&Manifest::load(&manifest).unwrap())).unwrap();
        let plan = create_plan(&provider, &Manifest::load(&manifest).unwrap(), &state)
            .await
            .unwrap();
        assert_eq!(plan.mutation_count(), 0);
    }

    #[tokio::test]
    async fn removing_a_resource_from_the_manifest_deletes_it() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(dir.path(), MANIFEST);
        run_apply(&cli, &manifest, true).await.unwrap();

        let manifest = write_manifest(
            dir.path(),
            r#"{
                "provider": { "adom": "branch", "device_name": "fgt-01" },
                "resources": [
                    { "type": "system_global", "name": "global",
                      "attributes": { "hostname": "fgt-02", "admintimeout": 30 } }
                ]
            }"#,
        );
        run_apply(&cli, &manifest, true).await.unwrap();

        let state = LocalBackend::with_path(cli.state.clone())
            .read_state()
            .await
            .unwrap()
            .unwrap();
        assert!(state.find_resource("object_firewall_address", "lan").is_none());
        let global = state.find_resource("system_global", "global").unwrap();
        assert_eq!(global.attributes.get("hostname"), Some(&serde_json::json!("fgt-02")));
    }

    #[tokio::test]
    async fn import_then_destroy() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(dir.path(), MANIFEST);

        let device = LocalClient::with_path(cli.store.clone());
        let mut obj = ApiObject::new();
        obj.insert("name".to_string(), serde_json::json!("servers"));
        obj.insert("member".to_string(), serde_json::json!(["web"]));
        device
            .create(
                &Endpoint::table("/pm/config/{adom}/obj/firewall/addrgrp", "name"),
                &obj,
                &Paradict::new().with("adom", "adom/branch"),
            )
            .await
            .unwrap();

        run_import(&cli, &manifest, "object_firewall_addrgrp", "servers", "servers")
            .await
            .unwrap();
        let err = run_import(&cli, &manifest, "object_firewall_addrgrp", "servers", "servers")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("is already managed"));

        run_destroy(&cli, &manifest, true).await.unwrap();
        let state = LocalBackend::with_path(cli.state.clone())
            .read_state()
            .await
            .unwrap()
            .unwrap();
        assert!(state.resources.is_empty());
        assert!(device.objects().unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_drops_vanished_resource() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(dir.path(), MANIFEST);

        let backend = LocalBackend::with_path(cli.state.clone());
        let mut state = StateFile::new();
        state.upsert_resource(
            ResourceState::new("object_firewall_address", "lan", "lan", "fortimanager")
                .with_attribute("name", serde_json::json!("lan")),
        );
        backend.write_state(&state).await.unwrap();

        let err = run_read(&cli, &manifest, "object_firewall_address", "lan")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no longer exists"));

        let state = backend.read_state().await.unwrap().unwrap();
        assert!(state.resources.is_empty());
    }

    async fn pending_mutations(cli: &Cli, manifest: &Path) -> usize {
        let manifest = Manifest::load(manifest).unwrap();
        let provider = build_provider(cli, Some(&manifest)).unwrap();
        let state = LocalBackend::with_path(cli.state.clone())
            .read_state()
            .await
            .unwrap()
            .unwrap_or_default();
        create_plan(&provider, &manifest, &state)
            .await
            .unwrap()
            .mutation_count()
    }

    fn wtp_profile_manifest(attributes: &str) -> String {
        format!(
            r#"{{
                "provider": {{ "adom": "branch" }},
                "resources": [
                    {{ "type": "object_wirelesscontroller_wtpprofile", "name": "ap",
                       "attributes": {} }}
                ]
            }}"#,
            attributes
        )
    }

    #[tokio::test]
    async fn nested_set_and_table_converge_after_apply() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(
            dir.path(),
            &wtp_profile_manifest(
                r#"{
                    "name": "ap",
                    "radio_1": { "band": "802.11ac", "channel": ["149", "36"] },
                    "deny_mac_list": [
                        { "id": "3", "mac": "00:09:0f:aa:bb:cc" },
                        { "id": "1", "mac": "00:09:0f:aa:bb:01" }
                    ]
                }"#,
            ),
        );

        assert_eq!(pending_mutations(&cli, &manifest).await, 1);
        run_apply(&cli, &manifest, true).await.unwrap();
        assert_eq!(pending_mutations(&cli, &manifest).await, 0);
    }

    #[tokio::test]
    async fn sorted_subtables_converge_after_apply() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(
            dir.path(),
            &wtp_profile_manifest(
                r#"{
                    "name": "ap",
                    "dynamic_sort_subtable": "true",
                    "deny_mac_list": [
                        { "id": 10, "mac": "00:09:0f:aa:bb:0a" },
                        { "id": 9, "mac": "00:09:0f:aa:bb:09" }
                    ]
                }"#,
            ),
        );

        run_apply(&cli, &manifest, true).await.unwrap();
        assert_eq!(pending_mutations(&cli, &manifest).await, 0);
    }

    #[tokio::test]
    async fn removed_block_and_attribute_converge_after_apply() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(
            dir.path(),
            &wtp_profile_manifest(
                r#"{
                    "name": "ap",
                    "comment": "lobby",
                    "radio_1": { "band": "802.11ac" }
                }"#,
            ),
        );
        run_apply(&cli, &manifest, true).await.unwrap();

        let manifest = write_manifest(dir.path(), &wtp_profile_manifest(r#"{ "name": "ap" }"#));
        assert_eq!(pending_mutations(&cli, &manifest).await, 1);
        run_apply(&cli, &manifest, true).await.unwrap();
        assert_eq!(pending_mutations(&cli, &manifest).await, 0);

        let state = LocalBackend::with_path(cli.state.clone())
            .read_state()
            .await
            .unwrap()
            .unwrap();
        let profile = state
            .find_resource("object_wirelesscontroller_wtpprofile", "ap")
            .unwrap();
        assert!(
            profile
                .attributes
                .get("radio_1")
                .is_none_or(|v| v == &serde_json::json!([]))
        );
    }

    #[tokio::test]
    async fn locked_state_blocks_apply_until_force_unlocked() {
        let dir = tempdir().unwrap();
        let cli = cli(dir.path());
        let manifest = write_manifest(dir.path(), MANIFEST);

        let backend = LocalBackend::with_path(cli.state.clone());
        let held = backend
            .acquire_lock(LockInfo::new("import").for_resource("object_firewall_addrgrp.servers"))
            .await
            .unwrap();

        let err = run_apply(&cli, &manifest, true).await.unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("import object_firewall_addrgrp.servers by"));
        assert!(message.contains(&held.id));

        run_force_unlock(&cli, &held.id).await.unwrap();
        run_apply(&cli, &manifest, true).await.unwrap();
        assert_eq!(pending_mutations(&cli, &manifest).await, 0);
    }

    #[test]
    fn unknown_api_keys_are_reported() {
        let provider = FmgrProvider::new(LocalClient::new(), ProviderConfig::default());
        let schema = schema_for(&provider, "object_firewall_address").unwrap();
        let obj = serde_json::json!({ "name": "lan", "subnet": ["10.0.0.0"], "obj-seq": 4 });

        assert_eq!(
            unknown_api_keys(schema, obj.as_object().unwrap()),
            vec!["obj-seq".to_string()]
        );
    }

    #[test]
    fn provider_config_prefers_explicit_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("provider.json");
        std::fs::write(&config_path, r#"{ "adom": "explicit", "retries": 3 }"#).unwrap();

        let mut cli = cli(dir.path());
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        cli.provider_config = Some(config_path);

        let config = provider_config(&cli, Some(&manifest)).unwrap();
        assert_eq!(config.retries, 3);

        cli.provider_config = None;
        let config = provider_config(&cli, Some(&manifest)).unwrap();
        assert_eq!(config.retries, 1);
    }
}
