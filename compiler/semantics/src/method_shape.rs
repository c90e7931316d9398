//! Method shape classification
//!
//! gRPC methods come in four shapes depending on whether each side streams.
//! Every backend that renders per-method code selects its template from this.

use descriptor::MethodDescriptor;

/// The four streaming shapes of an RPC method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MethodShape {
    /// One request, one response.
    Unary,
    /// A stream of requests, one response.
    ClientStreaming,
    /// One request, a stream of responses.
    ServerStreaming,
    /// Streams in both directions.
    BidiStreaming,
}

impl MethodShape {
    /// Classify from the two streaming flags.
    pub fn from_flags(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => MethodShape::Unary,
            (true, false) => MethodShape::ClientStreaming,
            (false, true) => MethodShape::ServerStreaming,
            (true, true) => MethodShape::BidiStreaming,
        }
    }

    /// Classify a method descriptor.
    pub fn of(method: &MethodDescriptor) -> Self {
        Self::from_flags(method.client_streaming(), method.server_streaming())
    }

    /// Canonical display name used in logs
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodShape::Unary => "unary",
            MethodShape::ClientStreaming => "client-streaming",
            MethodShape::ServerStreaming => "server-streaming",
            MethodShape::BidiStreaming => "bidi-streaming",
        }
    }
}

impl std::fmt::Display for MethodShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
