use dealscout::application::agents::ChatAssistant;
use dealscout::application::agents::chat::{MISSING_KEY_REPLY, prepare_context};
use dealscout::application::agents::comparator::cheapest;
use dealscout::application::agents::predictor::rank_deals;
use dealscout::config::ChatEnvConfig;
use dealscout::domain::chat::{ChatMessage, ChatRole};
use dealscout::domain::listing::Listing;
use dealscout::infrastructure::mock::MockChatService;
use std::sync::Arc;

fn listing(title: &str, price: f64, seller: &str) -> Listing {
    Listing {
        title: title.to_string(),
        price,
        seller: seller.to_string(),
        source: seller.to_string(),
        rating: Some(4.1),
        reviews: 120,
        link: format!("https://shop.example/{}", title),
        product_id: String::new(),
        history: None,
    }
}

fn market() -> Vec<Listing> {
    vec![
        listing("Rope Chain", 1500.0, "Myntra"),
        listing("Cuban Chain", 900.0, "Meesho"),
        listing("Figaro Chain", 2100.0, "Ajio"),
        listing("Box Chain", 1200.0, "Flipkart"),
    ]
}

#[test]
fn test_context_lists_deals_and_cheapest() {
    let clean = market();
    let deals = rank_deals(&clean, &[1600.0, 1300.0, 2000.0, 1250.0]);
    let cheap = cheapest(&clean);

    let context = prepare_context(&clean, &deals, &cheap);

    assert!(context.contains("- Total Items Scanned: 4"));
    assert!(context.contains("- Market Average Price: ₹1425.00"));
    assert!(context.contains("- Lowest Price Found: ₹900.00"));
    assert!(context.contains("- Cuban Chain at ₹900.00 (Save ₹400.00, Seller: Meesho)"));

    // Three cheapest only; the priciest listing is left out of that block
    let cheapest_block = context
        .split("LOWEST ABSOLUTE PRICES:")
        .nth(1)
        .unwrap_or_default();
    assert_eq!(cheapest_block.lines().filter(|l| l.starts_with("- ")).count(), 3);
    assert!(!cheapest_block.contains("Figaro"));
    assert!(cheapest_block.contains("- Box Chain at ₹1200.00 (Seller: Flipkart)"));
}

#[tokio::test]
async fn test_conversation_carries_recent_history() {
    let service = Arc::new(MockChatService::replying("Cuban Chain from Meesho."));
    let assistant = ChatAssistant::new(service.clone(), ChatEnvConfig::default());
    let clean = market();
    let context = prepare_context(&clean, &[], &cheapest(&clean));

    let mut history = Vec::new();
    for turn in ["hi", "what sells here?", "any gold?"] {
        let reply = assistant.ask(turn, &context, "gsk_test", &history).await;
        history.push(ChatMessage::user(turn));
        history.push(ChatMessage::assistant(reply));
    }

    let requests = service.requests();
    assert_eq!(requests.len(), 3);
    let last = &requests[2];
    // system + last 4 history messages + the new question
    assert_eq!(last.messages.len(), 6);
    assert_eq!(last.messages[0].role, ChatRole::System);
    assert!(last.messages[0].content.contains("You are 'Nexus AI'"));
    assert!(last.messages[0].content.contains("- Lowest Price Found: ₹900.00"));
    assert_eq!(last.messages[1].content, "hi");
    assert_eq!(last.messages[5].content, "any gold?");
    assert_eq!(last.model, "llama-3.3-70b-versatile");
}

#[tokio::test]
async fn test_missing_key_never_reaches_provider() {
    let service = Arc::new(MockChatService::new());
    let assistant = ChatAssistant::new(service.clone(), ChatEnvConfig::default());
    let reply = assistant.ask("cheapest?", "ctx", "", &[]).await;
    assert_eq!(reply, MISSING_KEY_REPLY);
    assert!(service.requests().is_empty());
}
