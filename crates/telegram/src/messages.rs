//! Localized user-facing reply texts.
//!
//! One pipeline, localisation at the edge: deployments differ only in which
//! message set the front end is handed. Burmese is the original deployment's
//! language and the fallback.

/// The full reply text set for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    pub welcome: &'static str,
    pub help: &'static str,
    pub language_note: &'static str,
    pub processing: &'static str,
    pub success: &'static str,
    pub caption: &'static str,
    pub api_error: &'static str,
    pub general_error: &'static str,
}

static BURMESE: Messages = Messages {
    welcome: "ဟယ်လို! ကျွန်တော်က TikTok ဗီဒီယိုဒေါင်းလုဒ်ဆွဲပေးတဲ့ bot ပါ။",
    help: "ဒီ bot ကိုဘယ်လိုသုံးမလဲ:\n\n\
           1. ကျွန်တော့်ကို TikTok link တစ်ခုပေးပါ\n\
           2. ဒါမှမဟုတ် group ထဲထည့်ပြီး TikTok link တွေကိုအလိုအလျောက်လုပ်ပေးမယ်\n\n\
           ကျွန်တော်က TikTok watermark မပါတဲ့ဗီဒီယိုကိုဒေါင်းလုဒ်ဆွဲပေးပါမယ်!",
    language_note: "ဒီ bot က မြန်မာဘာသာစကားကိုသုံးထားပါတယ်။",
    processing: "🔄 TikTok ဗီဒီယိုကိုလုပ်ဆောင်နေပါတယ်...",
    success: "✅ ဗီဒီယိုအောင်မြင်စွာဒေါင်းလုဒ်ဆွဲပြီးပါပြီ!",
    caption: "ဒါကတော့ TikTok watermark မပါတဲ့ဗီဒီယိုပါ!",
    api_error: "❌ ဗီဒီယိုဒေါင်းလုဒ်ဆွဲရန်မအောင်မြင်ပါ။ API ပြဿနာရှိနေနိုင်သည်။",
    general_error: "❌ ဗီဒီယိုလုပ်ဆောင်ရာတွင်အမှားတစ်ခုဖြစ်ပွားခဲ့သည်။",
};

static ENGLISH: Messages = Messages {
    welcome: "Hi! I'm a TikTok video download bot.",
    help: "How to use this bot:\n\n\
           1. Send me a TikTok link\n\
           2. Or add me to a group and I'll handle TikTok links automatically\n\n\
           I'll download the video without the TikTok watermark!",
    language_note: "This bot replies in English.",
    processing: "🔄 Processing the TikTok video...",
    success: "✅ Video downloaded successfully!",
    caption: "Here's the video without the TikTok watermark!",
    api_error: "❌ Could not download the video. The API may be having problems.",
    general_error: "❌ Something went wrong while processing the video.",
};

impl Messages {
    /// Message keys, in declaration order. Reported by the health listener's
    /// `/language` route.
    pub const KEYS: &'static [&'static str] = &[
        "welcome",
        "help",
        "language_note",
        "processing",
        "success",
        "caption",
        "api_error",
        "general_error",
    ];

    /// Built-in message set for `locale`; unknown locales fall back to
    /// Burmese, the original deployment's language.
    #[must_use]
    pub fn for_locale(locale: &str) -> &'static Messages {
        match locale {
            "en" => &ENGLISH,
            _ => &BURMESE,
        }
    }
}
