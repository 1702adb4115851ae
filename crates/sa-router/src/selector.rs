//! Flow selection and per-flow recommendations.

use sa_core::{Flow, FlowRecommendations, Intent, ResponseStyle, Urgency};

/// Pick the flow: escalation wins, then the intent's dedicated flow, else IVR.
pub fn select_flow(should_escalate: bool, intent: Intent) -> Flow {
    if should_escalate {
        return Flow::Ava;
    }
    match intent {
        Intent::ProductSearch => Flow::ProductSearch,
        Intent::OrderTracking => Flow::OrderTracking,
        Intent::Recommendation => Flow::Recommendations,
        _ => Flow::Ivr,
    }
}

fn suggestions(flow: Flow) -> &'static [&'static str] {
    match flow {
        Flow::Ava => &[
            "Use empathetic language",
            "Acknowledge frustration",
            "Offer immediate solutions",
            "Provide escalation options",
            "Create support ticket if needed",
        ],
        Flow::ProductSearch => &[
            "Search product database",
            "Show relevant products",
            "Offer alternatives if no results",
            "Provide filtering options",
            "Include product recommendations",
        ],
        Flow::OrderTracking => &[
            "Request order ID",
            "Check order status",
            "Provide tracking information",
            "Offer support if issues",
        ],
        Flow::Recommendations => &[
            "Analyze user preferences",
            "Show personalized products",
            "Include trending items",
            "Offer category suggestions",
        ],
        Flow::Ivr => &[
            "Provide quick solutions",
            "Use helpful tone",
            "Offer related suggestions",
            "Guide to self-service options",
        ],
    }
}

/// Advisory payload for a flow.
pub fn recommendations_for(flow: Flow) -> FlowRecommendations {
    let escalated = flow.is_escalated();
    FlowRecommendations {
        response_style: if escalated { ResponseStyle::Empathetic } else { ResponseStyle::Efficient },
        urgency: if escalated { Urgency::High } else { Urgency::Normal },
        suggestions: suggestions(flow).iter().map(|s| s.to_string()).collect(),
    }
}
