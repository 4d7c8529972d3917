// LLM prompt templates for the recommendation pipeline.
// System prompts live in llm_client::prompts, keyed by response shape.

/// Query interpretation prompt. Replace `{query}` before sending.
pub const INTERPRET_PROMPT_TEMPLATE: &str = r#"You are an expert career counselor for rural and urban job seekers in India.

Analyze the user's query and extract structured information.

Query: "{query}"

Extract:
1. Skills: List all relevant skills mentioned or inferred (max 15 skills)
2. Job Titles: Suggest 3-5 relevant job titles
3. Locations: Extract mentioned locations, or suggest top 3 locations if not mentioned
4. Experience Level: "entry-level", "mid-level", or "experienced"

Respond in JSON format with this exact structure:
{
  "skills": ["skill1", "skill2"],
  "job_titles": ["title1", "title2"],
  "locations": ["location1", "location2"],
  "experience_level": "entry-level|mid-level|experienced"
}"#;

/// Listing synthesis prompt.
/// Replace: {skills}, {job_titles}, {locations}, {experience}
pub const SYNTHESIZE_PROMPT_TEMPLATE: &str = r#"You are a job recommendation expert for the Indian job market.

Based on the extracted information:
Skills: {skills}
Job Titles: {job_titles}
Locations: {locations}
Experience: {experience}

Generate 8-12 realistic job opportunities that would be suitable for this candidate.
Consider:
- Government jobs for rural candidates
- Private sector opportunities
- Both remote and on-site positions
- Entry-level to mid-level positions

For each job provide:
- Title (realistic job title)
- Company (realistic company name)
- Location (city, state)
- Description (2-3 lines about responsibilities)
- Source (e.g., "Naukri", "Indeed", "Apna", "Government Portal")

IMPORTANT: Respond ONLY with a valid JSON array. Do not include any text before or after the array.
The JSON should look like this:

[
  {
    "title": "Job Title",
    "company": "Company Name",
    "location": "City, State",
    "description": "Brief description of responsibilities and requirements",
    "url": "https://example.com/job",
    "source": "Naukri"
  }
]

Make the descriptions realistic and relevant to the Indian job market. Generate at least 8 jobs."#;
