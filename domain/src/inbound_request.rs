/// An inbound webhook request as captured at the transport boundary.
///
/// The body is kept byte-for-byte as received; signatures are computed over
/// these exact bytes, never over a re-serialized document. Header values are
/// `None` when the header was absent (or not valid UTF-8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    raw_body: Vec<u8>,
    signature_header: Option<String>,
    timestamp_header: Option<String>,
    webhook_id: Option<String>,
}

impl InboundRequest {
    pub fn new(
        raw_body: impl Into<Vec<u8>>,
        signature_header: Option<String>,
        timestamp_header: Option<String>,
        webhook_id: Option<String>,
    ) -> Self {
        Self {
            raw_body: raw_body.into(),
            signature_header,
            timestamp_header,
            webhook_id,
        }
    }

    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    pub fn signature_header(&self) -> Option<&str> {
        self.signature_header.as_deref()
    }

    pub fn timestamp_header(&self) -> Option<&str> {
        self.timestamp_header.as_deref()
    }

    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref()
    }
}
