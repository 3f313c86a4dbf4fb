use serde::{Deserialize, Serialize};

use super::error::BackendError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRequest {
    pub source_addresses: Vec<String>,
    pub receiver_address: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrepareResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub transactions: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PrepareResponse {
    pub fn into_transactions(self) -> Result<Vec<String>, BackendError> {
        if !self.success {
            let message = self
                .error
                .filter(|msg| !msg.trim().is_empty())
                .unwrap_or_else(|| "后端未能生成归集交易".to_string());
            return Err(BackendError::Rejected(message));
        }
        self.transactions
            .ok_or_else(|| BackendError::Schema("缺少 transactions 字段".to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest<'a> {
    pub transactions: &'a [String],
    pub encoding: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub bundle_id: Option<String>,
    #[serde(default)]
    pub error: Option<SubmitErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// 单个批次的提交结果，与批次一一对应、按提交顺序排列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResult {
    Accepted { bundle_id: String },
    Rejected { code: i64, message: String },
}

impl SubmissionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionResult::Accepted { .. })
    }
}

impl TryFrom<SubmitResponse> for SubmissionResult {
    type Error = BackendError;

    fn try_from(response: SubmitResponse) -> Result<Self, Self::Error> {
        if let Some(error) = response.error {
            return Ok(SubmissionResult::Rejected {
                code: error.code,
                message: error.message,
            });
        }
        match (response.success, response.bundle_id) {
            (true, Some(bundle_id)) => Ok(SubmissionResult::Accepted { bundle_id }),
            (true, None) => Err(BackendError::Schema("缺少 bundleId 字段".to_string())),
            (false, _) => Ok(SubmissionResult::Rejected {
                code: -1,
                message: "后端拒绝了该批次".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prepare_failure_carries_backend_message() {
        let response: PrepareResponse =
            serde_json::from_value(json!({"success": false, "error": "余额不足"}))
                .expect("parse prepare response");
        let err = response.into_transactions().expect_err("should fail");
        assert_eq!(err.to_string(), "余额不足");
    }

    #[test]
    fn prepare_success_without_transactions_is_schema_error() {
        let response: PrepareResponse =
            serde_json::from_value(json!({"success": true})).expect("parse prepare response");
        assert!(matches!(
            response.into_transactions(),
            Err(BackendError::Schema(_))
        ));
    }

    #[test]
    fn submit_response_maps_to_result() {
        let accepted: SubmitResponse =
            serde_json::from_value(json!({"success": true, "bundleId": "abc"})).unwrap();
        assert_eq!(
            SubmissionResult::try_from(accepted).unwrap(),
            SubmissionResult::Accepted {
                bundle_id: "abc".to_string()
            }
        );

        let rejected: SubmitResponse = serde_json::from_value(json!({
            "success": false,
            "error": {"code": -32602, "message": "bundle too large"}
        }))
        .unwrap();
        assert_eq!(
            SubmissionResult::try_from(rejected).unwrap(),
            SubmissionResult::Rejected {
                code: -32602,
                message: "bundle too large".to_string()
            }
        );
    }

    #[test]
    fn prepare_request_uses_camel_case() {
        let request = PrepareRequest {
            source_addresses: vec!["a".to_string()],
            receiver_address: "r".to_string(),
            percentage: 50.0,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["sourceAddresses"], json!(["a"]));
        assert_eq!(value["receiverAddress"], json!("r"));
        assert_eq!(value["percentage"], json!(50.0));
    }
}
