//! Debug sender: posts one sample message per content type to a chat, so
//! formatting changes can be eyeballed against the real Telegram parser.
//! Needs BOT_TOKEN and DEBUG_CHAT_ID in the environment (or a .env file).

use std::process::exit;

use teloxide::prelude::*;
use teloxide::types::ChatId;

use telegram_formatter::sender;
use telegram_formatter::ContentType;

const STANDARD_MARKDOWN_SAMPLE: &str = "\
# Сводка чата

Это **жирный текст** и *курсив*.

## Список покупок
- Молоко
- Хлеб

```python
print(\"hello\")
```

[Ссылка](https://core.telegram.org/bots/api)";

const HTML_SAMPLE: &str = "\
<h1>Отчет о работе</h1>
<b>успешно</b> завершили проект, см. <code>summary_v2</code>.
Подробнее: <a href=\"https://example.com\">здесь</a>";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    log::info!("Starting formatter debug send...");

    let bot_token = match std::env::var("BOT_TOKEN") {
        Ok(token) => token,
        Err(_) => {
            log::error!("BOT_TOKEN is not set");
            exit(1);
        }
    };
    let chat_id = match std::env::var("DEBUG_CHAT_ID")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
    {
        Some(id) => ChatId(id),
        None => {
            log::error!("DEBUG_CHAT_ID is not set or not a number");
            exit(1);
        }
    };

    let bot = Bot::new(bot_token);

    let samples: [(ContentType, &str); 5] = [
        (ContentType::Raw, "❌ Ошибка: Unsupported parse_mode (code=400)!"),
        (
            ContentType::Formatted,
            "**Статус**: готово. Параметр parse_mode не менялся.",
        ),
        (ContentType::Technical, "TelegramMessageSender.safe_send_message"),
        (ContentType::StandardMarkdown, STANDARD_MARKDOWN_SAMPLE),
        (ContentType::Html, HTML_SAMPLE),
    ];

    for (content_type, text) in samples {
        match sender::safe_send_message(&bot, chat_id, text, content_type, None).await {
            Ok(messages) => {
                log::info!("{}: sent {} message(s)", content_type, messages.len())
            }
            Err(e) => log::error!("{}: send failed: {}", content_type, e),
        }
    }

    log::info!("Debug send finished.");
}
