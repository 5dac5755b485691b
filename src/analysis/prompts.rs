//! Instruction templates keyed by document category.
//!
//! Each table covers the categories with specialized wording and falls
//! back to a generic instruction for everything else. Supporting a new
//! category means adding arms here.

use super::document_type::{DocumentCategory, DocumentType};
use super::language::Language;

pub fn entities(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::LegalContract => {
            "Extract these key legal elements from this contract:\n\
             - Parties involved (who are the contracting parties)\n\
             - Contract duration/important dates\n\
             - Payment terms and amounts\n\
             - Key obligations and responsibilities\n\
             - Termination clauses\n\
             - Penalties or consequences for breach\n\
             - Governing law/jurisdiction"
        }
        DocumentCategory::MedicalPolicy => {
            "Extract these medical policy elements:\n\
             - Coverage details (what's included)\n\
             - Premium amounts and payment schedule\n\
             - Deductibles and co-payments\n\
             - Excluded conditions or treatments\n\
             - Claim filing procedures\n\
             - Network providers and restrictions\n\
             - Policy period and renewal terms"
        }
        DocumentCategory::MedicalReport => {
            "Extract these medical elements:\n\
             - Diagnosis or medical findings\n\
             - Prescribed medications and dosages\n\
             - Treatment recommendations\n\
             - Follow-up instructions\n\
             - Test results and their significance\n\
             - Lifestyle recommendations\n\
             - Warning signs to watch for"
        }
        DocumentCategory::EmploymentDocument => {
            "Extract these employment elements:\n\
             - Job title and responsibilities\n\
             - Salary and benefits\n\
             - Work schedule and location\n\
             - Reporting structure\n\
             - Performance expectations\n\
             - Termination conditions\n\
             - Confidentiality requirements"
        }
        _ => "Extract key information from this document:",
    }
}

pub fn checklist(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::LegalContract => {
            "Create a practical checklist for someone who needs to comply with this contract:\n\
             - Pre-signing requirements (what to verify before signing)\n\
             - Important deadlines and dates to remember\n\
             - Key obligations they must fulfill\n\
             - Payment schedules and amounts\n\
             - Documentation they need to maintain\n\
             - Warning signs of potential issues"
        }
        DocumentCategory::MedicalPolicy => {
            "Create an actionable checklist for policy holders:\n\
             - How to file claims (step-by-step process)\n\
             - Important deadlines for claims and renewals\n\
             - What documentation to keep\n\
             - Emergency procedures and contacts\n\
             - Annual requirements (checkups, renewals)\n\
             - Cost-saving tips based on policy terms"
        }
        DocumentCategory::MedicalReport => {
            "Create a patient action checklist:\n\
             - Medications to take (names, dosages, timing)\n\
             - Lifestyle changes recommended\n\
             - Follow-up appointments to schedule\n\
             - Symptoms to monitor and report\n\
             - Emergency warning signs requiring immediate attention\n\
             - Questions to ask at next appointment"
        }
        DocumentCategory::EmploymentDocument => {
            "Create an employee checklist:\n\
             - Onboarding requirements to complete\n\
             - Key policies to understand and follow\n\
             - Performance milestones and deadlines\n\
             - Benefits to enroll in\n\
             - Required training or certifications\n\
             - Important contacts and reporting procedures"
        }
        _ => "Create an action checklist based on this document:",
    }
}

pub fn risk(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::LegalContract => {
            "Identify potential risks, concerns, or unfavorable terms in this contract:\n\
             - Unusual or strict penalties\n\
             - Vague or ambiguous language that could cause problems\n\
             - Automatic renewal clauses\n\
             - Limitation of liability issues\n\
             - Unfavorable payment terms\n\
             - Difficult termination conditions"
        }
        DocumentCategory::MedicalPolicy => {
            "Identify potential issues or limitations with this medical policy:\n\
             - Significant coverage gaps or exclusions\n\
             - High out-of-pocket costs or deductibles\n\
             - Restrictive network limitations\n\
             - Complex claim procedures that could lead to denials\n\
             - Pre-authorization requirements\n\
             - Waiting periods for coverage"
        }
        DocumentCategory::MedicalReport => {
            "Identify important health considerations and warnings:\n\
             - Serious conditions that require immediate attention\n\
             - Potential drug interactions or side effects\n\
             - Lifestyle changes that are critical for health\n\
             - Symptoms that would require emergency care\n\
             - Follow-up care that shouldn't be delayed\n\
             - Test results that need monitoring"
        }
        DocumentCategory::EmploymentDocument => {
            "Identify potential employment concerns:\n\
             - Unusual restrictive clauses (non-compete, etc.)\n\
             - Unclear job expectations or responsibilities\n\
             - Below-market compensation or benefits\n\
             - Strict performance requirements\n\
             - Limited advancement opportunities\n\
             - Concerning termination conditions"
        }
        _ => "Identify important considerations and potential risks in this document:",
    }
}

/// Extra focus line for summaries; empty for categories without one.
pub fn summary_focus(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::LegalContract => "Focus on parties, obligations, terms, and key dates.",
        DocumentCategory::MedicalPolicy | DocumentCategory::MedicalReport => {
            "Focus on coverage, costs, procedures, and important limitations."
        }
        DocumentCategory::EmploymentDocument => {
            "Focus on role, compensation, responsibilities, and key policies."
        }
        _ => "",
    }
}

pub const ENTITIES_DIRECTIVE: &str = "Present the information in a clear, structured format with bullet points.\n\
     Focus only on information that is explicitly mentioned in the document.";

pub const CHECKLIST_DIRECTIVE: &str =
    "Format as a clear, actionable checklist with specific items they can act on.\n\
     Use checkboxes (- [ ]) format for each actionable item.";

pub const RISK_DIRECTIVE: &str =
    "Present as clear warnings or considerations. Be specific about what to watch out for.\n\
     Note: This is informational analysis, not professional legal or medical advice.";

/// Domain named in the term-explanation persona.
fn terms_domain(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::Unknown => "legal and medical documents",
        known => known.dispatch_key(),
    }
}

pub fn terms(category: DocumentCategory, text: &str) -> String {
    format!(
        "You are an expert in {domain} who specializes in explaining complex terms to everyday people.\n\n\
         Analyze this document and find complex legal, medical, or technical terms that regular people might not understand.\n\
         For each term, provide a simple explanation in plain language.\n\n\
         Document: {text}\n\n\
         Format each explanation as:\n\
         **[Term]**: Simple explanation in everyday language\n\n\
         Only include terms that actually appear in the document.\n\
         Focus on the most important or confusing terms (maximum 10 terms).",
        domain = terms_domain(category),
    )
}

pub fn summary(doc_type: &DocumentType, text: &str) -> String {
    let label = doc_type.label.trim();
    let opening = if label.is_empty() {
        "Create a comprehensive summary of this document.".to_string()
    } else {
        format!("Create a comprehensive summary of this {} document.", label)
    };
    format!(
        "{opening}\n{focus}\n\n\
         Document: {text}\n\n\
         Structure your summary with:\n\
         1. Document Overview (what type of document and main purpose)\n\
         2. Key Points (most important information)\n\
         3. Important Details (dates, amounts, requirements)\n\
         4. Action Items (what the reader needs to do)\n\n\
         Keep it detailed but easy to understand.",
        focus = summary_focus(doc_type.category),
    )
}

pub fn simplify(subject: &str, text: &str) -> String {
    let domain_note = if subject.is_empty() {
        String::new()
    } else {
        format!(" Focus on {} terminology and concepts.", subject)
    };
    format!(
        "Simplify the following text into plain, user-friendly language that anyone can understand.\n\
         {domain_note}\n\n\
         Guidelines:\n\
         - Replace legal/medical jargon with everyday words\n\
         - Break down complex sentences into simpler ones\n\
         - Explain what things mean in practical terms\n\
         - Keep the important information but make it accessible\n\n\
         Text to simplify: {text}"
    )
}

pub fn translate(language: Language, text: &str) -> String {
    format!(
        "Translate the following text into {language}.\n\
         Maintain the formatting and structure of the original text.\n\
         Keep technical terms accurate and provide context where needed.\n\n\
         Text to translate: {text}"
    )
}

pub fn classify(text: &str) -> String {
    let categories: String = DocumentCategory::ALL
        .iter()
        .map(|c| format!("- {}\n", c.display_name()))
        .collect();
    format!(
        "Analyze this document and classify it into one of these categories:\n\
         {categories}\n\
         Document text: {text}\n\n\
         Respond with just the category name and a brief explanation (1-2 sentences)."
    )
}

pub fn question(
    doc_type: &DocumentType,
    context: &str,
    question: &str,
    language: Language,
) -> String {
    let label = doc_type.label.trim();
    let persona = if doc_type.is_known() {
        format!("You are an expert analyst specializing in {} documents. ", label)
    } else {
        String::new()
    };
    format!(
        "{persona}You are helping someone understand their document in simple, clear language.\n\n\
         Document Type: {label}\n\
         Document Context: {context}\n\n\
         User Question: {question}\n\n\
         Instructions:\n\
         - Provide a detailed, helpful answer in {language}\n\
         - Focus on practical implications and actionable information\n\
         - Explain any complex terms you use\n\
         - If the document doesn't contain the answer, say so clearly\n\
         - Be specific and cite relevant parts of the document when possible\n\n\
         Answer:"
    )
}
