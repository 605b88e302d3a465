//! Plan - Effects needed to converge the device to the manifest
//!
//! Building a plan refreshes every managed resource from the device but
//! changes nothing.

use std::collections::HashMap;

use anyhow::{Result, anyhow};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use fmgr_core::convert::expand;
use fmgr_core::diff::{Diff, diff};
use fmgr_core::provider::Provider;
use fmgr_core::resource::{ResourceData, Value};
use fmgr_core::schema::ResourceSchema;
use fmgr_state::StateFile;

use crate::manifest::Manifest;

#[derive(Debug, Clone)]
pub enum Effect {
    /// Managed and unchanged; carries the refreshed data
    Read { name: String, data: ResourceData },
    Create { name: String, data: ResourceData },
    Update {
        name: String,
        from: ResourceData,
        to: ResourceData,
        changed: Vec<String>,
    },
    /// Managed but no longer declared
    Delete { name: String, data: ResourceData },
}

impl Effect {
    pub fn name(&self) -> &str {
        match self {
            Effect::Read { name, .. }
            | Effect::Create { name, .. }
            | Effect::Update { name, .. }
            | Effect::Delete { name, .. } => name,
        }
    }

    pub fn resource_type(&self) -> &str {
        match self {
            Effect::Read { data, .. }
            | Effect::Create { data, .. }
            | Effect::Delete { data, .. } => &data.resource_type,
            Effect::Update { to, .. } => &to.resource_type,
        }
    }

    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type(), self.name())
    }

    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    effects: Vec<Effect>,
}

impl Plan {
    pub fn add(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }

    pub fn mutation_count(&self) -> usize {
        self.effects.iter().filter(|e| e.is_mutating()).count()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for effect in &self.effects {
            match effect {
                Effect::Read { .. } => {}
                Effect::Create { .. } => summary.create += 1,
                Effect::Update { .. } => summary.update += 1,
                Effect::Delete { .. } => summary.delete += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plan: {} to create, {} to update, {} to delete",
            self.create, self.update, self.delete
        )
    }
}

/// Refresh managed resources and compare them with the manifest
///
/// Deletions come first, in reverse state order, so sub-resources go before
/// their parents.
pub async fn create_plan(
    provider: &dyn Provider,
    manifest: &Manifest,
    state: &StateFile,
) -> Result<Plan> {
    let mut plan = Plan::default();

    for recorded in state.resources.iter().rev() {
        if !manifest.contains(&recorded.resource_type, &recorded.name) {
            plan.add(Effect::Delete {
                name: recorded.name.clone(),
                data: recorded.to_data(),
            });
        }
    }

    for block in &manifest.resources {
        let schema = provider
            .schema(&block.resource_type)
            .ok_or_else(|| anyhow!("Unknown resource type: {}", block.resource_type))?;
        let desired = block.desired(schema)?;

        let current = match state.find_resource(&block.resource_type, &block.name) {
            Some(recorded) => {
                let refreshed = provider.read(recorded.to_data()).await?;
                if refreshed.has_id() {
                    Some(refreshed)
                } else {
                    log::warn!("{} no longer exists on the device", block.address());
                    None
                }
            }
            None => None,
        };

        let change = diff(schema, &desired, current.as_ref().map(|d| d.attributes()));
        let name = block.name.clone();
        let effect = match (change, current) {
            (Diff::Update { changed_attributes }, Some(current)) => Effect::Update {
                name,
                to: updated_data(schema, &current, desired),
                from: current,
                changed: changed_attributes,
            },
            (Diff::NoChange, Some(current)) => Effect::Read {
                name,
                data: current,
            },
            _ => Effect::Create {
                name,
                data: ResourceData::new(block.resource_type.clone()).with_attributes(desired),
            },
        };
        plan.add(effect);
    }

    Ok(plan)
}

/// Desired attributes laid over the refreshed ones
///
/// Computed attributes the manifest leaves out keep their device value;
/// other attributes left out are cleared.
fn updated_data(
    schema: &ResourceSchema,
    current: &ResourceData,
    desired: HashMap<String, Value>,
) -> ResourceData {
    let mut attributes = current.attributes().clone();
    for (name, attr) in &schema.attributes {
        if !desired.contains_key(name) && !attr.computed {
            attributes.remove(name);
        }
    }
    attributes.extend(desired);

    ResourceData::new(current.resource_type.clone())
        .with_id(current.id())
        .with_attributes(attributes)
        .with_prior(current.attributes().clone())
}

pub fn print_plan(plan: &Plan, provider: &dyn Provider) {
    if plan.mutation_count() == 0 {
        println!("{}", "No changes. Device configuration is up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();

    for effect in plan.effects() {
        let schema = provider.schema(effect.resource_type());
        match effect {
            Effect::Read { .. } => {}
            Effect::Create { data, .. } => {
                println!("  {} {}", "+".green().bold(), effect.address().green());
                let mut names: Vec<&String> = data.attributes().keys().collect();
                names.sort();
                for name in names {
                    let value = display_value(schema, name, &data.attributes()[name]);
                    println!("      {}: {}", name, value);
                }
            }
            Effect::Update {
                from, to, changed, ..
            } => {
                println!(
                    "  {} {} ({})",
                    "~".yellow().bold(),
                    effect.address().yellow(),
                    from.id()
                );
                for name in changed {
                    let old = from
                        .get(name)
                        .map(|v| display_value(schema, name, v))
                        .unwrap_or_else(|| "(none)".to_string());
                    let new = to
                        .get(name)
                        .map(|v| display_value(schema, name, v))
                        .unwrap_or_else(|| "(none)".to_string());
                    println!("      {}: {} → {}", name, old.red(), new.green());
                }
                if let Some(schema) = schema {
                    print_payload_diff(schema, from, to);
                }
            }
            Effect::Delete { data, .. } => {
                println!(
                    "  {} {} ({})",
                    "-".red().bold(),
                    effect.address().red(),
                    data.id()
                );
            }
        }
    }

    println!();
    println!("{}", plan.summary().to_string().bold());
}

/// Show the API object sent for an update against the one currently stored
fn print_payload_diff(schema: &ResourceSchema, from: &ResourceData, to: &ResourceData) {
    let empty = HashMap::new();
    let (Ok(before), Ok(after)) = (
        expand(&schema.attributes, from.attributes(), &empty),
        expand(&schema.attributes, to.attributes(), &empty),
    ) else {
        return;
    };
    let (Ok(before), Ok(after)) = (
        serde_json::to_string_pretty(&before),
        serde_json::to_string_pretty(&after),
    ) else {
        return;
    };

    let diff = TextDiff::from_lines(&before, &after);
    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        let line = line.trim_end();
        match change.tag() {
            ChangeTag::Delete => println!("        {}", format!("- {}", line).red()),
            ChangeTag::Insert => println!("        {}", format!("+ {}", line).green()),
            ChangeTag::Equal => {}
        }
    }
}

fn display_value(schema: Option<&ResourceSchema>, name: &str, value: &Value) -> String {
    if schema
        .and_then(|s| s.get(name))
        .is_some_and(|attr| attr.sensitive)
    {
        return "(sensitive)".to_string();
    }
    format_value(value)
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Map(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let entries: Vec<String> = entries
                .into_iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmgr_client::MemoryClient;
    use fmgr_provider::{FmgrProvider, ProviderConfig};
    use fmgr_state::ResourceState;

    fn provider() -> FmgrProvider<MemoryClient> {
        FmgrProvider::new(MemoryClient::new(), ProviderConfig::default())
    }

    fn manifest(json: &str) -> Manifest {
        Manifest::from_json(json).unwrap()
    }

    const SERVERS: &str = r#"{ "resources": [
        { "type": "object_firewall_addrgrp", "name": "servers",
          "attributes": { "name": "servers", "member": ["web", "db"] } }
    ] }"#;

    #[tokio::test]
    async fn unmanaged_resource_is_created() {
        let provider = provider();
        let plan = create_plan(&provider, &manifest(SERVERS), &StateFile::new())
            .await
            .unwrap();

        assert_eq!(
            plan.summary(),
            PlanSummary {
                create: 1,
                update: 0,
                delete: 0
            }
        );
        assert_eq!(plan.effects()[0].address(), "object_firewall_addrgrp.servers");
    }

    #[tokio::test]
    async fn converged_resource_is_only_read() {
        let provider = provider();
        let desired = manifest(SERVERS);
        let Effect::Create { data, .. } = create_plan(&provider, &desired, &StateFile::new())
            .await
            .unwrap()
            .into_effects()
            .remove(0)
        else {
            panic!("expected a create");
        };
        let created = provider.create(data).await.unwrap();

        let mut state = StateFile::new();
        state.upsert_resource(ResourceState::from_data("servers", "fortimanager", &created));

        let plan = create_plan(&provider, &desired, &state).await.unwrap();
        assert_eq!(plan.mutation_count(), 0);
        assert!(matches!(plan.effects()[0], Effect::Read { .. }));
    }

    #[tokio::test]
    async fn changed_and_vanished_resources() {
        let provider = provider();
        let created = provider
            .create(
                ResourceData::new("object_firewall_addrgrp")
                    .with_attribute("name", Value::String("servers".to_string()))
                    .with_attribute("member", Value::List(vec![Value::String("web".to_string())]))
                    .with_attribute("comment", Value::String("old".to_string())),
            )
            .await
            .unwrap();

        let mut state = StateFile::new();
        state.upsert_resource(ResourceState::from_data("servers", "fortimanager", &created));
        state.upsert_resource(ResourceState::new(
            "object_firewall_addrgrp",
            "gone",
            "gone",
            "fortimanager",
        ));

        let plan = create_plan(&provider, &manifest(SERVERS), &state).await.unwrap();
        assert_eq!(
            plan.summary(),
            PlanSummary {
                create: 0,
                update: 1,
                delete: 1
            }
        );

        assert!(matches!(&plan.effects()[0], Effect::Delete { name, .. } if name == "gone"));
        let Effect::Update { to, changed, .. } = &plan.effects()[1] else {
            panic!("expected an update");
        };
        assert_eq!(changed, &vec!["comment".to_string(), "member".to_string()]);
        assert!(to.get("comment").is_none());
        assert!(to.has_change("comment"));
        assert_eq!(to.id(), "servers");
    }

    #[tokio::test]
    async fn unknown_type_in_manifest() {
        let provider = provider();
        let err = create_plan(
            &provider,
            &manifest(r#"{ "resources": [ { "type": "object_firewall_policy", "name": "p" } ] }"#),
            &StateFile::new(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource type: object_firewall_policy");
    }

    #[test]
    fn format_nested_values() {
        let mut row = HashMap::new();
        row.insert("port_mode".to_string(), Value::String("offline".to_string()));
        row.insert("port_ssid".to_string(), Value::Int(2));
        assert_eq!(
            format_value(&Value::List(vec![Value::Map(row)])),
            "[{port_mode: \"offline\", port_ssid: 2}]"
        );
    }
}
