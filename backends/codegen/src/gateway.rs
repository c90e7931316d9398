//! `gateway`: one Istio `VirtualService` routing every method to its service.
//!
//! gRPC requests carry `/{package}.{Service}/{Method}` as their HTTP path, so
//! an exact-path match per method is enough to fan a single host out to the
//! per-method deployments.

use std::fmt::Write;

use codegen::naming::service_name;
use descriptor::{GeneratedFile, GenerationRequest};
use parameter::Parameters;
use plugins::{Generator, Result};
use semantics::methods_to_generate;

use crate::namespace;

/// Name of the generated `VirtualService`.
pub const GATEWAY_NAME: &str = "grpc-gateway";

/// One exact-path routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// gRPC request path.
    pub path: String,
    /// Knative service the path is served by.
    pub service_name: String,
}

/// The `gateway` generator. Meta mode only; a target method is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayGenerator;

/// Routing rules for every method in the files to generate.
pub fn routes(request: &GenerationRequest) -> Vec<Route> {
    methods_to_generate(request)
        .into_iter()
        .map(|m| Route { path: m.rpc_path(), service_name: service_name(m.service_name(), m.method_name()) })
        .collect()
}

/// Render the `VirtualService`.
pub fn render_routing(
    namespace: &str,
    domain: &str,
    routes: &[Route],
) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "apiVersion: networking.istio.io/v1alpha3")?;
    writeln!(out, "kind: VirtualService")?;
    writeln!(out, "metadata:")?;
    writeln!(out, "  name: {GATEWAY_NAME}")?;
    writeln!(out, "  namespace: {namespace}")?;
    writeln!(out, "spec:")?;
    writeln!(out, "  gateways:")?;
    writeln!(out, "  - knative-ingress-gateway.knative-serving.svc.cluster.local")?;
    writeln!(out, "  - mesh")?;
    writeln!(out, "  hosts:")?;
    match domain {
        "" => writeln!(out, "  - \"*\"")?,
        domain => writeln!(out, "  - {domain}")?,
    }
    if routes.is_empty() {
        writeln!(out, "  http: []")?;
        return Ok(out);
    }
    writeln!(out, "  http:")?;
    for route in routes {
        writeln!(out, "  - match:")?;
        writeln!(out, "    - uri:")?;
        writeln!(out, "        exact: {}", route.path)?;
        writeln!(out, "    rewrite:")?;
        writeln!(out, "      authority: {}.{namespace}.svc.cluster.local", route.service_name)?;
        writeln!(out, "    route:")?;
        writeln!(out, "    - destination:")?;
        writeln!(out, "        host: istio-ingressgateway.istio-system.svc.cluster.local")?;
        writeln!(out, "        port:")?;
        writeln!(out, "          number: 80")?;
        writeln!(out, "      weight: 100")?;
    }
    Ok(out)
}

impl Generator for GatewayGenerator {
    fn name(&self) -> &'static str { "gateway" }

    fn description(&self) -> &'static str { "Istio VirtualService routing every method" }

    fn generate(&self, params: &Parameters, request: &GenerationRequest) -> Result<Vec<GeneratedFile>> {
        let routes = routes(request);
        tracing::debug!(count = routes.len(), "rendering gateway routes");
        let content = render_routing(namespace(params), &params.domain, &routes)?;
        Ok(vec![GeneratedFile::new("gateway.yaml", content)])
    }
}
