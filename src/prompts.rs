//! System instructions and task lines for each content kind

use crate::compose::ContentKind;

const CLOSING_GUIDANCE: &str = "If a course plan is provided, strictly adhere to its references and topics. \
If not, use your general knowledge and web search for content.";

const NOTES_SYSTEM: &str = r####"You are an expert academic assistant. Your output MUST be a single, perfectly valid JSON object. Do NOT include any text outside of this JSON object, not even explanations or conversational remarks.
The JSON object must have a single key "notes", and its value must be a string containing the notes in Markdown format.
Pay meticulous attention to JSON syntax: proper quoting of keys and string values, and ensure the entire output is one single JSON object.
Example: {"notes": "### Topic 1\n- Point A\n- Point B\n### Topic 2\n- Point C"}"####;

const FLASHCARDS_SYSTEM: &str = r####"You are an expert flashcard creator. Your output MUST be a single, perfectly valid JSON object. Do NOT include any text outside of this JSON object, not even explanations or conversational remarks.
The JSON object must have a key "flashcards", which is an array of objects. Each object in the array must have a "question" string key and an "answer" string key.
Pay meticulous attention to JSON syntax, especially commas between elements in arrays or objects, and proper quoting of all keys and string values.
Example: {"flashcards": [{"question": "What is X?", "answer": "X is Y."}, {"question": "What is Z?", "answer": "Z is A."}]}"####;

const QUIZ_AND_RESOURCES_SYSTEM: &str = r####"You are an expert quiz and resource curator. Your output MUST be a single, perfectly valid JSON object. Do NOT include any text outside of this JSON object, not even explanations or conversational remarks.
The JSON object must have two keys: "quiz" and "resources".
The value for "quiz" MUST be an array of quiz question objects. Each quiz question object MUST have the following string keys: "question", "correctAnswerText" (which must be exactly one of the provided options), and optionally "explanation". It MUST also have an "options" key, whose value is an array of 4 unique strings representing the choices.
The value for "resources" MUST be an array of resource objects. Each resource object MUST have "title" (string) and "uri" (string) keys, and optionally a "type" key (e.g., 'YouTube Channel', 'Article', 'Research Paper', 'Book', 'Online Notebook', 'Course Material').
Suggest a diverse range of 2-4 resources: relevant YouTube channels, insightful articles, official documentation, course materials, research papers, interactive notebooks, seminal books, or other widely recognized recommendations pertinent to the query.
Pay meticulous attention to JSON syntax: commas between array elements and key-value pairs, proper quoting of all keys and string values.
Example: {"quiz": [{"question": "What is the capital of France?", "options": ["London", "Berlin", "Paris", "Madrid"], "correctAnswerText": "Paris", "explanation": "Paris is the capital city of France."}], "resources": [{"title": "Khan Academy - World History", "uri": "https://www.youtube.com/user/khanacademylife", "type": "YouTube Channel"}, {"title": "A Brief History of Time by Stephen Hawking", "uri": "https://example.com/book/a-brief-history-of-time", "type": "Book"}]}"####;

/// Fixed system instruction for a content kind
pub fn system_instruction(kind: ContentKind) -> String {
    let schema = match kind {
        ContentKind::Notes => NOTES_SYSTEM,
        ContentKind::Flashcards => FLASHCARDS_SYSTEM,
        ContentKind::QuizAndResources => QUIZ_AND_RESOURCES_SYSTEM,
    };
    format!("{schema}\n{CLOSING_GUIDANCE}")
}

/// What the user content asks for, after the plan and query
pub fn task_line(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Notes => {
            "Generate detailed study notes based on the query and course plan (if provided)."
        }
        ContentKind::Flashcards => {
            "Generate 5-10 flashcards based on the query and course plan (if provided)."
        }
        ContentKind::QuizAndResources => {
            "Based on the above:\n\
             1. Generate a 2-3 question multiple-choice quiz.\n\
             2. Suggest 2-4 diverse external learning resources (e.g., YouTube channels, articles, research papers, books, online notebooks, course materials)."
        }
    }
}
