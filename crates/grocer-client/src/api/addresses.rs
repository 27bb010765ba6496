//! Address book routes. Addresses are never deleted, only disabled.

use grocer_core::validation::validate_address;
use grocer_core::Address;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::WithId;
use crate::endpoints;
use crate::error::ClientResult;
use crate::http::ApiClient;

/// Address form as the backend expects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAddress {
    #[serde(rename = "address_line")]
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(rename = "pincode")]
    pub zipcode: String,
    #[serde(rename = "mobile")]
    pub phone: String,
}

impl NewAddress {
    pub fn validate(&self) -> ClientResult<()> {
        validate_address(
            &self.line1,
            &self.city,
            &self.state,
            &self.country,
            &self.zipcode,
            &self.phone,
        )?;
        Ok(())
    }
}

impl From<&Address> for NewAddress {
    fn from(address: &Address) -> Self {
        NewAddress {
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            country: address.country.clone(),
            zipcode: address.zipcode.clone(),
            phone: address.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DisableBody<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
    status: bool,
}

impl ApiClient {
    pub async fn addresses(&self) -> ClientResult<Vec<Address>> {
        self.fetch(endpoints::GET_ADDRESSES).await
    }

    /// Saves a new address. Returns the stored record when the backend echoes it.
    pub async fn create_address(&self, address: &NewAddress) -> ClientResult<Option<Address>> {
        address.validate()?;
        let response = self.request(endpoints::CREATE_ADDRESS, Some(address)).await?;
        Ok(response.data)
    }

    pub async fn update_address(&self, id: &str, address: &NewAddress) -> ClientResult<String> {
        address.validate()?;
        self.send_ack(endpoints::UPDATE_ADDRESS, Some(&WithId { id, body: address }))
            .await
    }

    /// Soft delete: the backend flips the status flag.
    pub async fn disable_address(&self, id: &str) -> ClientResult<String> {
        let message = self
            .send_ack(endpoints::DISABLE_ADDRESS, Some(&DisableBody { id, status: false }))
            .await?;
        info!(address_id = %id, "Address disabled");
        Ok(message)
    }
}
