//! REST adapter for the remote expense service.
//!
//! Implements `ExpenseGateway` over the service's JSON API. One request per
//! action, no retry; the bearer token from the session is attached to every
//! authenticated call.

use crate::domain::entities::{GroupId, UserId};
use crate::domain::{
    DomainError, ExpensePayload, ExpenseSplit, Group, GroupMember, Participant, Payment,
    PaymentMethod, Session,
};
use crate::ports::ExpenseGateway;
use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP gateway to the expense service.
pub struct RestGateway {
    client: reqwest::Client,
    base_url: String,
}

impl RestGateway {
    /// Create a new gateway.
    ///
    /// Fails if the HTTP client cannot be constructed; a client without the
    /// configured timeout must not be handed out silently.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://api.example.com" (no trailing slash)
    /// * `timeout` - Per-request timeout applied to every call
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::Api(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.header("Authorization", format!("Bearer {}", session.token))
    }

    /// Extract a service error message from a non-success response.
    ///
    /// The service answers with `{"error": ...}` or `{"message": ...}`;
    /// anything else is reported as the truncated raw body.
    async fn error_from_response(response: reqwest::Response) -> DomainError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %text, "expense service returned error");
        let detail = serde_json::from_str::<ServiceError>(&text)
            .ok()
            .and_then(|e| e.error.or(e.message))
            .unwrap_or_else(|| text.chars().take(200).collect());
        DomainError::Api(format!("{}: {}", status, detail))
    }
}

#[derive(Deserialize)]
struct ServiceError {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    phone_number: &'a str,
}

#[derive(Deserialize)]
struct RegisterResponse {
    message: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user_id: UserId,
    username: Option<String>,
}

#[derive(Serialize)]
struct CreateGroupRequest<'a> {
    group_name: &'a str,
    members: &'a [GroupMember],
    user_id: UserId,
}

#[derive(Deserialize)]
struct UserProfileResponse {
    name: String,
}

#[derive(Deserialize)]
struct ExpenseSplitsResponse {
    result: Vec<ExpenseSplit>,
}

#[derive(Serialize)]
struct ExpenseSplitRequest {
    expense_id: i64,
    user_id: UserId,
    amount_owed: f64,
    amount_paid: f64,
}

#[derive(Serialize)]
struct PaymentRequest {
    payer_id: UserId,
    group_id: GroupId,
    payee_id: UserId,
    amount: f64,
    payment_method: PaymentMethod,
}

#[derive(Deserialize)]
struct PaymentResponse {
    payment: Payment,
}

#[async_trait::async_trait]
impl ExpenseGateway for RestGateway {
    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone_number: &str,
    ) -> Result<String, DomainError> {
        let response = self
            .client
            .post(self.url("/users/register"))
            .json(&RegisterRequest {
                username,
                email,
                password,
                phone_number,
            })
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse response: {}", e)))?;
        Ok(body
            .message
            .unwrap_or_else(|| "Account created".to_string()))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let response = self
            .client
            .post(self.url("/users/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await
            .map_err(|e| DomainError::Auth(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            return Err(DomainError::Auth(err.to_string()));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Auth(format!("Failed to parse login response: {}", e)))?;

        info!(user_id = body.user_id, "logged in");
        Ok(Session {
            token: body.token,
            user_id: body.user_id,
            username: body.username,
        })
    }

    async fn user_profile(
        &self,
        session: &Session,
        user_id: UserId,
    ) -> Result<String, DomainError> {
        let request = self.client.get(self.url(&format!("/users/{}", user_id)));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: UserProfileResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse profile: {}", e)))?;
        Ok(body.name)
    }

    async fn create_group(
        &self,
        session: &Session,
        group_name: &str,
        members: &[GroupMember],
    ) -> Result<String, DomainError> {
        let request = self
            .client
            .post(self.url("/groups/add-member"))
            .json(&CreateGroupRequest {
                group_name,
                members,
                user_id: session.user_id,
            });
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        info!(group_name, members = members.len(), "group created");
        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse response: {}", e)))?;
        Ok(body.message.unwrap_or_else(|| "Group created".to_string()))
    }

    async fn groups_for_user(&self, session: &Session) -> Result<Vec<Group>, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("/groups/user/{}", session.user_id)));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let groups: Vec<Group> = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse groups: {}", e)))?;
        debug!(count = groups.len(), "fetched groups");
        Ok(groups)
    }

    async fn group_members(
        &self,
        session: &Session,
        group_id: GroupId,
    ) -> Result<Vec<Participant>, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("/groupMembers/{}", group_id)));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let members: Vec<Participant> = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse members: {}", e)))?;
        debug!(group_id, count = members.len(), "fetched group members");
        Ok(members)
    }

    async fn create_expense(
        &self,
        session: &Session,
        payload: &ExpensePayload,
    ) -> Result<(), DomainError> {
        let request = self.client.post(self.url("/expenses/create")).json(payload);
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        info!(
            group_id = payload.group_id,
            amount = payload.amount,
            payments = payload.payments.len(),
            "expense created"
        );
        Ok(())
    }

    async fn expense_splits(
        &self,
        session: &Session,
        expense_id: i64,
    ) -> Result<Vec<ExpenseSplit>, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("/expenseSplits/{}", expense_id)));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        // The service wraps the list in a `result` envelope.
        let body: ExpenseSplitsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse splits: {}", e)))?;
        debug!(expense_id, count = body.result.len(), "fetched splits");
        Ok(body.result)
    }

    async fn create_expense_split(
        &self,
        session: &Session,
        expense_id: i64,
        split: &ExpenseSplit,
    ) -> Result<(), DomainError> {
        let request = self
            .client
            .post(self.url("/expenseSplits/create"))
            .json(&ExpenseSplitRequest {
                expense_id,
                user_id: split.user_id,
                amount_owed: split.amount_owed,
                amount_paid: split.amount_paid,
            });
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        info!(expense_id, user_id = split.user_id, "split recorded");
        Ok(())
    }

    async fn payments_for_user(&self, session: &Session) -> Result<Vec<Payment>, DomainError> {
        let request = self
            .client
            .get(self.url(&format!("/payments/user/{}", session.user_id)));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse payments: {}", e)))
    }

    async fn create_payment(
        &self,
        session: &Session,
        group_id: GroupId,
        payee_id: UserId,
        amount: f64,
        method: PaymentMethod,
    ) -> Result<Payment, DomainError> {
        let request = self
            .client
            .post(self.url("/payments/create"))
            .json(&PaymentRequest {
                payer_id: session.user_id,
                group_id,
                payee_id,
                amount,
                payment_method: method,
            });
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body: PaymentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Api(format!("Failed to parse payment: {}", e)))?;
        info!(payment_id = body.payment.payment_id, amount, "payment created");
        Ok(body.payment)
    }

    async fn complete_payment(
        &self,
        session: &Session,
        payment_id: i64,
    ) -> Result<(), DomainError> {
        let request = self
            .client
            .put(self.url(&format!("/payments/complete/{}", payment_id)))
            .json(&serde_json::json!({}));
        let response = self
            .authorized(request, session)
            .send()
            .await
            .map_err(|e| DomainError::Api(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        info!(payment_id, "payment marked complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gw = RestGateway::new("http://localhost:8080/".into(), Duration::from_secs(5))
            .expect("client with timeout");
        assert_eq!(gw.url("/users/login"), "http://localhost:8080/users/login");
    }

    #[test]
    fn expense_split_request_uses_wire_field_names() {
        let req = ExpenseSplitRequest {
            expense_id: 11,
            user_id: 2,
            amount_owed: 300.0,
            amount_paid: 100.0,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "expense_id": 11,
                "user_id": 2,
                "amount_owed": 300.0,
                "amount_paid": 100.0
            })
        );
    }

    #[test]
    fn expense_splits_envelope_unwraps_result() {
        let body = r#"{"result": [{"user_id": 2, "name": "bob", "amount_owed": 300.0}]}"#;
        let parsed: ExpenseSplitsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.len(), 1);
        assert_eq!(parsed.result[0].amount_owed, 300.0);
        // amount_paid missing from the envelope defaults to 0
        assert_eq!(parsed.result[0].amount_paid, 0.0);
    }

    #[test]
    fn create_group_request_matches_service_shape() {
        let members = vec![GroupMember {
            username: "bob".into(),
            email: "bob@example.com".into(),
            is_admin: false,
        }];
        let req = CreateGroupRequest {
            group_name: "Flatmates",
            members: &members,
            user_id: 1,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["group_name"], "Flatmates");
        assert_eq!(json["user_id"], 1);
        assert_eq!(json["members"][0]["email"], "bob@example.com");
    }

    #[test]
    fn payment_request_uses_wire_field_names() {
        let req = PaymentRequest {
            payer_id: 1,
            group_id: 2,
            payee_id: 3,
            amount: 40.0,
            payment_method: PaymentMethod::BankTransfer,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["payment_method"], "BANK_TRANSFER");
        assert_eq!(json["payer_id"], 1);
    }

    #[test]
    fn expense_payload_matches_service_shape() {
        use crate::domain::entities::{ParticipantRef, PaymentEntry};
        let payload = ExpensePayload {
            group_id: 7,
            paid_by: 1,
            amount: 900.0,
            description: "Hotel".into(),
            expense_type: "EQUAL".into(),
            participants: vec![ParticipantRef { user_id: 1 }],
            payments: vec![PaymentEntry {
                user_id: 1,
                amount: 900.0,
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["expense_type"], "EQUAL");
        assert_eq!(json["participants"][0], serde_json::json!({"user_id": 1}));
        assert_eq!(
            json["payments"][0],
            serde_json::json!({"user_id": 1, "amount": 900.0})
        );
    }
}
