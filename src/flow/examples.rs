//! Example prompts offered on the entry screen

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExamplePrompt {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
}

const EXAMPLES: [ExamplePrompt; 4] = [
    ExamplePrompt {
        id: "1",
        title: "Connect Shopify to BigQuery",
        description: "Sync your e-commerce data to Google BigQuery for analytics",
        prompt: "Connect Shopify orders and customers to BigQuery for data analysis",
    },
    ExamplePrompt {
        id: "2",
        title: "Sync Salesforce contacts to Mailchimp",
        description: "Automatically sync contacts between CRM and email marketing",
        prompt: "Sync Salesforce contacts and leads to Mailchimp for email campaigns",
    },
    ExamplePrompt {
        id: "3",
        title: "Get PostgreSQL users and send to a webhook",
        description: "Extract user data and send to external webhook",
        prompt: "Get PostgreSQL users and send to a webhook",
    },
    ExamplePrompt {
        id: "4",
        title: "Analyze Stripe payments in Google Sheets",
        description: "Real-time payment data analysis in spreadsheets",
        prompt: "Analyze Stripe payments in Google Sheets",
    },
];

pub fn example_prompts() -> &'static [ExamplePrompt] {
    &EXAMPLES
}
