//! 프롬프트 템플릿
//!
//! PDF 발췌문과 웹 검색 결과를 하나의 컨텍스트로 묶고,
//! 의료기기/헬스케어 기술 자문용 지시문과 함께 질문을 감쌉니다.

/// PDF + 웹 검색 컨텍스트 블록
pub fn build_context(pdf_text: &str, web_results: &str) -> String {
    format!(
        "### PDF DOCUMENTATION:\n{}\n\n### WEB SEARCH RESULTS:\n{}",
        pdf_text, web_results
    )
}

/// 언어 모델에 보낼 전체 프롬프트 생성
pub fn generate_prompt(question: &str, pdf_text: &str, web_results: &str) -> String {
    let context = build_context(pdf_text, web_results);

    format!(
        r#"
You are MediTech Advisor, an expert AI specializing in medical equipment, devices, healthcare technology systems, and related regulatory standards. A healthcare professional has asked: "{question}"

First, analyze this question to identify the specific medical technology domain, key requirements, and information needs.

### AVAILABLE CONTEXT
{context}

### INSTRUCTIONS
1. Provide a comprehensive, accurate, and structured response focusing exclusively on medical equipment and healthcare systems.
2. Begin with a clear, direct answer to the question.
3. Include precise technical specifications, clinical applications, and operational considerations when relevant.
4. Organize your response with clear headings and bullet points for readability.
5. If comparing technologies or approaches, use a structured comparison format.
6. Include numerical data and statistics when available.
7. For regulatory information, specify applicable standards (FDA, CE, ISO, etc.) and requirements.
8. If safety considerations are relevant, highlight them prominently.
9. Cite your sources explicitly (PDF document names with page numbers, URLs from web results).
10. If information is incomplete, clearly state what additional data would be helpful.
11. For implementation questions, include practical considerations and best practices.
12. Use medical and technical terminology appropriately, defining complex terms.

### RESPONSE FORMAT
Structure your answer with these sections as appropriate:
- Summary Answer (direct response to the question)
- Technical Specifications (when discussing equipment)
- Clinical Applications
- Operational Considerations
- Regulatory & Safety Information
- Comparison Table (when comparing options)
- Implementation Guidelines
- Sources & Citations

Format your response using Markdown for readability. Use tables for comparing options and bullet points for lists.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_context() {
        assert_eq!(
            build_context("pdf", "web"),
            "### PDF DOCUMENTATION:\npdf\n\n### WEB SEARCH RESULTS:\nweb"
        );
    }

    #[test]
    fn test_generate_prompt_embeds_inputs() {
        let prompt = generate_prompt("How are ventilators calibrated?", "PDF CTX", "WEB CTX");
        assert!(prompt.contains("has asked: \"How are ventilators calibrated?\""));
        assert!(prompt.contains("### PDF DOCUMENTATION:\nPDF CTX"));
        assert!(prompt.contains("### WEB SEARCH RESULTS:\nWEB CTX"));
        assert!(prompt.contains("### RESPONSE FORMAT"));
    }
}
