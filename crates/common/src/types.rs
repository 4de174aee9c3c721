//! 通用类型定义

use chrono::{DateTime, Utc};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 操作员 ID
///
/// 仅用于审计字段，不承担任何鉴权语义
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[display("{_0}")]
pub struct OperatorId(pub Uuid);

impl OperatorId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 审计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub created_by: Option<OperatorId>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<OperatorId>,
}

impl AuditInfo {
    pub fn new(operator: Option<OperatorId>) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: operator.clone(),
            updated_at: now,
            updated_by: operator,
        }
    }

    pub fn update(&mut self, operator: Option<OperatorId>) {
        self.updated_at = Utc::now();
        self.updated_by = operator;
    }
}

impl Default for AuditInfo {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_update_moves_updated_fields_only() {
        let creator = OperatorId::from_uuid(Uuid::new_v4());
        let editor = OperatorId::from_uuid(Uuid::new_v4());

        let mut audit = AuditInfo::new(Some(creator.clone()));
        let created_at = audit.created_at;
        audit.update(Some(editor.clone()));

        assert_eq!(audit.created_at, created_at);
        assert_eq!(audit.created_by, Some(creator));
        assert_eq!(audit.updated_by, Some(editor));
        assert!(audit.updated_at >= created_at);
    }

    #[test]
    fn test_operator_id_parse() {
        assert!(OperatorId::from_string("not-a-uuid").is_err());
        let raw = "018f2a4e-1c2b-7d3e-9f00-0123456789ab";
        assert_eq!(OperatorId::from_string(raw).unwrap().to_string(), raw);
    }
}
