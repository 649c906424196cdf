use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Leading letter/digit, then letters, digits, and the punctuation that is
    // part of skill names ("c++", "c#", "node-js", "aren't").
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}+#\-']*").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Normalize free text into a set of comparable tokens: NFKC fold, lowercase,
/// stopword removal, tokens shorter than two characters dropped. Duplicates
/// collapse; frequency is not modeled at this layer.
///
/// Empty input yields an empty set, never an error, and the function is pure:
/// the same text always produces the same set.
pub fn normalize(text: &str) -> HashSet<String> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let mut tokens = HashSet::new();
    for mat in RE.find_iter(&folded) {
        let token = mat.as_str();
        if token.chars().count() < 2 || is_stopword(token) { continue; }
        tokens.insert(token.to_string());
    }
    tokens
}
