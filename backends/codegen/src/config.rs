//! `config`: the Knative `Service` manifest of one method.

use std::fmt::Write;
use std::sync::Arc;

use codegen::naming::{entrypoint_image, method_package, service_name};
use codegen::{clean_generated_source, proto_arguments, render_dispatch_file, Toolchain};
use descriptor::{DeployOptions, GeneratedFile, GenerationRequest};
use parameter::{Mode, Parameters};
use plugins::{Generator, Result};

use crate::methods::DISPATCH_FILE;
use crate::{namespace, plan_all, target, Fanout};

/// Port the entrypoint listens on inside the container.
pub const CONTAINER_PORT: u16 = 8080;

/// Everything the manifest template needs.
#[derive(Debug, Clone)]
pub struct ManifestOptions<'a> {
    /// Knative service name.
    pub name: String,
    /// Target namespace.
    pub namespace: String,
    /// Import path the container image is built from.
    pub image: String,
    /// Binary name inside the image, used by the probes.
    pub binary: String,
    /// Deployment options declared on the method.
    pub deploy: Option<&'a DeployOptions>,
}

/// The `config` generator.
#[derive(Debug, Clone)]
pub struct ConfigGenerator {
    toolchain: Arc<Toolchain>,
}

impl ConfigGenerator {
    /// Create the generator with the toolchain its directives call.
    pub fn new(toolchain: Arc<Toolchain>) -> Self { Self { toolchain } }
}

/// YAML double-quoted scalar.
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Render the manifest. Zero concurrency and zero timeout are left to the
/// platform defaults and omitted, as are empty env and resource sections.
pub fn render_manifest(options: &ManifestOptions<'_>) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "apiVersion: serving.knative.dev/v1alpha1")?;
    writeln!(out, "kind: Service")?;
    writeln!(out, "metadata:")?;
    writeln!(out, "  name: {}", options.name)?;
    writeln!(out, "  namespace: {}", options.namespace)?;
    writeln!(out, "spec:")?;
    writeln!(out, "  template:")?;
    writeln!(out, "    spec:")?;

    let default_options = DeployOptions::default();
    let deploy = options.deploy.unwrap_or(&default_options);
    if !deploy.service_account.is_empty() {
        writeln!(out, "      serviceAccountName: {}", deploy.service_account)?;
    }
    if deploy.container_concurrency != 0 {
        writeln!(out, "      containerConcurrency: {}", deploy.container_concurrency)?;
    }
    if deploy.timeout_seconds != 0 {
        writeln!(out, "      timeoutSeconds: {}", deploy.timeout_seconds)?;
    }

    writeln!(out, "      containers:")?;
    writeln!(out, "      - image: {}", options.image)?;
    writeln!(out, "        ports:")?;
    writeln!(out, "        - name: h2c")?;
    writeln!(out, "          containerPort: {CONTAINER_PORT}")?;
    for probe in ["readinessProbe", "livenessProbe"] {
        writeln!(out, "        {probe}:")?;
        writeln!(out, "          exec:")?;
        writeln!(out, "            command: [\"/ko-app/{}\", \"probe\"]", options.binary)?;
    }

    if !deploy.env.is_empty() {
        writeln!(out, "        env:")?;
        for var in &deploy.env {
            writeln!(out, "        - name: {}", var.name)?;
            writeln!(out, "          value: {}", quote(&var.value))?;
        }
    }

    if let Some(resources) = deploy.resources.as_ref() {
        if !resources.limits.is_empty() || !resources.requests.is_empty() {
            writeln!(out, "        resources:")?;
            for (section, quantities) in [("limits", &resources.limits), ("requests", &resources.requests)] {
                if quantities.is_empty() {
                    continue;
                }
                writeln!(out, "          {section}:")?;
                for (resource, quantity) in quantities {
                    writeln!(out, "            {resource}: {}", quote(quantity))?;
                }
            }
        }
    }

    Ok(out)
}

impl Generator for ConfigGenerator {
    fn name(&self) -> &'static str { "config" }

    fn description(&self) -> &'static str { "Knative Service manifest per method" }

    fn generate(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        if params.mode() == Mode::Meta {
            let invocations = plan_all(self.name(), params, request, Fanout::SharedDirectory);
            tracing::debug!(count = invocations.len(), "planned manifests");
            let protos = proto_arguments(params, request);
            let content = render_dispatch_file("config", &invocations, &self.toolchain, &protos, false);
            return Ok(vec![GeneratedFile::new(DISPATCH_FILE, clean_generated_source(&content))]);
        }

        let method = target(params, request)?;
        let (service, name) = (method.service_name(), method.method_name());
        let options = ManifestOptions {
            name: service_name(service, name),
            namespace: namespace(params).to_string(),
            image: entrypoint_image(&params.base, &params.gen_dir, service, name),
            binary: method_package(name),
            deploy: method.method.deploy_options(),
        };
        let content = render_manifest(&options)?;
        Ok(vec![GeneratedFile::new(format!("{}.yaml", options.name), content)])
    }
}
