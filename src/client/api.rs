use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use super::ClientError;
use crate::models::employee::{Employee, EmployeeUpdate, NewEmployee};

/// The HTTP API as seen from the client side.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<Employee>, ClientError>;

    async fn get_employee(&self, id: Uuid) -> Result<Employee, ClientError>;

    async fn create_employee(&self, new_employee: &NewEmployee) -> Result<Employee, ClientError>;

    async fn update_employee(&self, id: Uuid, update: &EmployeeUpdate) -> Result<Employee, ClientError>;

    async fn delete_employee(&self, id: Uuid) -> Result<(), ClientError>;

    async fn toggle_status(&self, id: Uuid) -> Result<Employee, ClientError>;

    /// Returns the server's `message`.
    async fn seed(&self) -> Result<String, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// `EmployeeApi` over reqwest. No timeouts, retries or de-duplication.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpApi {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[async_trait]
impl EmployeeApi for HttpApi {
    async fn list_employees(&self) -> Result<Vec<Employee>, ClientError> {
        debug!("GET {}/employees", self.base_url);
        json(self.client.get(self.url("/employees")).send().await?).await
    }

    async fn get_employee(&self, id: Uuid) -> Result<Employee, ClientError> {
        json(self.client.get(self.url(&format!("/employees/{}", id))).send().await?).await
    }

    async fn create_employee(&self, new_employee: &NewEmployee) -> Result<Employee, ClientError> {
        let response = self
            .client
            .post(self.url("/employees"))
            .json(new_employee)
            .send()
            .await?;
        json(response).await
    }

    async fn update_employee(&self, id: Uuid, update: &EmployeeUpdate) -> Result<Employee, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/employees/{}", id)))
            .json(update)
            .send()
            .await?;
        json(response).await
    }

    async fn delete_employee(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/employees/{}", id)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    async fn toggle_status(&self, id: Uuid) -> Result<Employee, ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("/employees/{}/toggle", id)))
            .send()
            .await?;
        json(response).await
    }

    async fn seed(&self) -> Result<String, ClientError> {
        let body: MessageBody = json(self.client.post(self.url("/seed")).send().await?).await?;
        Ok(body.message)
    }
}
