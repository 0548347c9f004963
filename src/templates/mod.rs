pub mod thanks_rankings;
