//! 역할 기반 접근 제어 (RBAC).
//!
//! 역할 값은 외부 인증 서비스가 토큰에 담아 발급합니다.
//! 와이어 값은 `"Administrador"`, `"Vendedor"`, `"Consultor"`이며
//! 대소문자 구분 없이 영문 이름도 허용합니다.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 관리자 - 상품 생성/수정/삭제 포함 모든 권한
    Administrator,
    /// 판매자 - 조회 및 재고 차감
    Seller,
    /// 컨설턴트 - 조회 및 재고 차감
    Consultant,
}

impl Role {
    /// 역할이 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: Permission) -> bool {
        match self {
            Role::Administrator => true,
            Role::Seller | Role::Consultant => matches!(permission, Permission::DecreaseStock),
        }
    }

    /// 토큰에 기록되는 와이어 값.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "Administrador",
            Role::Seller => "Vendedor",
            Role::Consultant => "Consultor",
        }
    }

    /// 문자열에서 역할 파싱 (대소문자 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "administrador" | "administrator" | "admin" => Some(Role::Administrator),
            "vendedor" | "seller" => Some(Role::Seller),
            "consultor" | "consultant" => Some(Role::Consultant),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("unknown role: {raw}")))
    }
}

/// 시스템 권한.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// 상품 생성/수정/삭제
    ManageProducts,
    /// 재고 차감
    DecreaseStock,
}

impl Permission {
    /// 권한에 대한 설명 반환.
    pub fn description(&self) -> &'static str {
        match self {
            Permission::ManageProducts => "상품 관리",
            Permission::DecreaseStock => "재고 차감",
        }
    }
}
