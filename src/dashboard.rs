//! Dashboard composition
//!
//! A widget is shown when the user's layout gives it a positive width and the
//! provider behind it reports the user as logged in. Provider status is looked
//! up at most once per provider and only when some enabled widget needs it. A
//! failed status check counts as "not logged in" so the login still succeeds
//! with a smaller dashboard.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::GatewayError;
use crate::provider::ProviderGateway;
use crate::store::{ConfigStore, Placement, Provider, UserId, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    #[serde(rename = "X")]
    pub x: i64,
    #[serde(rename = "Y")]
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    #[serde(rename = "WidgetName")]
    pub name: &'static str,
    #[serde(rename = "WidgetType")]
    pub widget_type: &'static str,
    #[serde(rename = "WidgetPosition")]
    pub position: Point,
    #[serde(rename = "WidgetSize")]
    pub size: Point,
}

impl Widget {
    fn new(kind: WidgetKind, placement: Placement) -> Self {
        Self {
            name: kind.as_str(),
            widget_type: "Small",
            position: Point {
                x: placement.x,
                y: placement.y,
            },
            size: Point {
                x: placement.w,
                y: placement.h,
            },
        }
    }
}

/// Build the ordered widget list for a user
pub async fn compose<C, P>(
    config_store: &C,
    timeline: &P,
    mail: &P,
    user_id: UserId,
) -> Result<Vec<Widget>, GatewayError>
where
    C: ConfigStore + ?Sized,
    P: ProviderGateway,
{
    let config = config_store
        .get_config(user_id)?
        .ok_or(GatewayError::ConfigNotFound(user_id.0))?;

    let mut status: HashMap<Provider, bool> = HashMap::new();
    let mut widgets = Vec::new();

    for kind in WidgetKind::ALL {
        let placement = config.placement(kind);
        if !placement.is_enabled() {
            continue;
        }

        let provider = kind.provider();
        let logged_in = match status.get(&provider) {
            Some(known) => *known,
            None => {
                let gateway = match provider {
                    Provider::Timeline => timeline,
                    Provider::Mail => mail,
                };
                let checked = check_status(gateway, provider, user_id).await;
                status.insert(provider, checked);
                checked
            }
        };

        if logged_in {
            widgets.push(Widget::new(kind, placement));
        }
    }

    tracing::debug!(user_id = user_id.0, widgets = widgets.len(), "Composed dashboard");

    Ok(widgets)
}

async fn check_status<P: ProviderGateway>(gateway: &P, provider: Provider, user_id: UserId) -> bool {
    match gateway.is_logged_in(user_id).await {
        Ok(logged_in) => logged_in,
        Err(e) => {
            tracing::warn!(
                provider = provider.as_str(),
                user_id = user_id.0,
                error = %e,
                "Provider status check failed, treating as logged out"
            );
            false
        }
    }
}
