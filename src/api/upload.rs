use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::client::{path_segment, KnackClient};
use crate::error::{Error, Result, UploadPhase};
use crate::http::RequestDescriptor;

impl KnackClient {
    /// Stores a file asset, then creates a record whose `field_key` points
    /// at it.
    ///
    /// The asset request carries a copy of `body`'s fields. The record is
    /// created from another copy of `body` with `field_key` set to the id
    /// the asset request returned. `body` must be a JSON object (or null).
    ///
    /// The two steps run strictly in sequence. If the first fails the
    /// record is never created; if the second fails the stored asset is
    /// left in place. Either failure comes back as [`Error::Upload`] naming
    /// the phase. An unusable `object_key` or `body` is refused before
    /// anything is sent.
    #[instrument(skip(self, body))]
    pub async fn upload(
        &self,
        object_key: &str,
        field_key: &str,
        filename: &str,
        body: Value,
    ) -> Result<Value> {
        path_segment(object_key)?;
        let fields = match body {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            _ => return Err(Error::InvalidBody),
        };

        let asset_id = self
            .upload_asset(fields.clone())
            .await
            .map_err(|source| Error::Upload {
                phase: UploadPhase::Asset,
                source: Box::new(source),
            })?;
        debug!(%asset_id, "asset stored, attaching to record");

        // We now have our asset. The record gets the caller's fields, with
        // the file field pointing at the asset.
        let mut record = fields;
        record.insert(field_key.to_string(), asset_id);
        self.create_record(object_key, Value::Object(record))
            .await
            .map_err(|source| Error::Upload {
                phase: UploadPhase::Attach,
                source: Box::new(source),
            })
    }

    async fn upload_asset(&self, fields: Map<String, Value>) -> Result<Value> {
        let path = format!(
            "applications/{}/assets/file/upload",
            path_segment(self.app_id())?
        );
        let response = self
            .request(RequestDescriptor::new(path).body(Value::Object(fields)))
            .await?;

        // Anything other than a string or numeric id means the asset wasn't stored.
        match response.get("id") {
            Some(id @ (Value::String(_) | Value::Number(_))) => Ok(id.clone()),
            _ => Err(Error::MissingField("id")),
        }
    }
}
