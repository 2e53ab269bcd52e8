// src/models/billing.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Valor usado nos limites para "sem limite".
pub const UNLIMITED: i32 = -1;

// --- ENUMS ---

// Mapeia o CREATE TYPE subscription_plan do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "subscription_plan", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
    Incomplete,
}

/// Qual contador mensal uma geração consome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UsageKind {
    Proposals,
    PitchDecks,
}

impl UsageKind {
    pub fn display_plural(self) -> &'static str {
        match self {
            UsageKind::Proposals => "proposals",
            UsageKind::PitchDecks => "pitch decks",
        }
    }

    /// Nome da coluna em `usage_records`.
    pub fn column(self) -> &'static str {
        match self {
            UsageKind::Proposals => "proposals",
            UsageKind::PitchDecks => "pitch_decks",
        }
    }
}

// --- TABELA DE PLANOS (estática) ---

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub proposals: i32,
    pub pitch_decks: i32,
}

impl PlanLimits {
    pub fn limit_for(&self, kind: UsageKind) -> i32 {
        match kind {
            UsageKind::Proposals => self.proposals,
            UsageKind::PitchDecks => self.pitch_decks,
        }
    }

    /// `None` quando o plano é ilimitado para esse tipo.
    pub fn finite_limit(&self, kind: UsageKind) -> Option<i32> {
        match self.limit_for(kind) {
            UNLIMITED => None,
            limit => Some(limit),
        }
    }

    pub fn allows(&self, kind: UsageKind, used: i32) -> bool {
        match self.finite_limit(kind) {
            None => true,
            Some(limit) => used < limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanDetails {
    pub plan: Plan,
    #[schema(value_type = String)]
    pub name: &'static str,
    #[schema(value_type = f64)]
    pub price: Decimal,
    #[schema(value_type = Vec<String>)]
    pub features: &'static [&'static str],
    pub limits: PlanLimits,
}

const FREE_FEATURES: &[&str] = &["5 proposals/month", "3 pitch decks/month", "Basic templates"];
const PRO_FEATURES: &[&str] = &[
    "Unlimited proposals",
    "Unlimited pitch decks",
    "Premium templates",
    "Priority support",
];
const ENTERPRISE_FEATURES: &[&str] = &[
    "Everything in Pro",
    "Custom branding",
    "Team collaboration",
    "Advanced analytics",
    "Dedicated support",
];

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Pro, Plan::Enterprise];

    pub fn limits(self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits { proposals: 5, pitch_decks: 3 },
            Plan::Pro | Plan::Enterprise => PlanLimits {
                proposals: UNLIMITED,
                pitch_decks: UNLIMITED,
            },
        }
    }

    pub fn details(self) -> PlanDetails {
        let (name, price, features) = match self {
            Plan::Free => ("Free", 0, FREE_FEATURES),
            Plan::Pro => ("Pro", 19, PRO_FEATURES),
            Plan::Enterprise => ("Enterprise", 49, ENTERPRISE_FEATURES),
        };

        PlanDetails {
            plan: self,
            name,
            price: Decimal::new(price, 0),
            features,
            limits: self.limits(),
        }
    }
}

// --- LINHAS DO BANCO ---

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: Uuid,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Atualização parcial: campos `None` ficam como estão.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionUpdate {
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub stripe_price_id: Option<String>,
    pub plan: Option<Plan>,
    pub status: Option<SubscriptionStatus>,
    pub current_period_start: Option<DateTime<Utc>>,
    pub current_period_end: Option<DateTime<Utc>>,
    pub cancel_at_period_end: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub user_id: Uuid,
    pub month: String, // YYYY-MM
    pub proposals: i32,
    pub pitch_decks: i32,
}

impl Usage {
    pub fn count(&self, kind: UsageKind) -> i32 {
        match kind {
            UsageKind::Proposals => self.proposals,
            UsageKind::PitchDecks => self.pitch_decks,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingOverview {
    pub subscription: Subscription,
    pub usage: Usage,
    pub limits: PlanLimits,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_plan_is_limited() {
        let limits = Plan::Free.limits();
        assert!(limits.allows(UsageKind::Proposals, 4));
        assert!(!limits.allows(UsageKind::Proposals, 5));
        assert!(limits.allows(UsageKind::PitchDecks, 2));
        assert!(!limits.allows(UsageKind::PitchDecks, 3));
    }

    #[test]
    fn unlimited_ignores_counter() {
        for plan in [Plan::Pro, Plan::Enterprise] {
            let limits = plan.limits();
            assert_eq!(limits.finite_limit(UsageKind::Proposals), None);
            assert!(limits.allows(UsageKind::Proposals, i32::MAX));
            assert!(limits.allows(UsageKind::PitchDecks, 10_000));
        }
    }

    #[test]
    fn plan_details_match_pricing_table() {
        let pro = Plan::Pro.details();
        assert_eq!(pro.name, "Pro");
        assert_eq!(pro.price, Decimal::new(19, 0));
        assert_eq!(pro.limits.proposals, UNLIMITED);

        let free = serde_json::to_value(Plan::Free.details()).unwrap();
        assert_eq!(free["plan"], "FREE");
        assert_eq!(free["limits"]["pitchDecks"], 3);
        assert_eq!(free["features"][0], "5 proposals/month");
    }
}
