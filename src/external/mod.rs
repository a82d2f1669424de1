pub mod google_news;
pub mod markup;
pub mod naver_news;
pub mod news_provider;
pub mod papago;
pub mod price_provider;
pub mod telegram;
pub mod translator;
pub mod yahoo;
