use tripwise_prompt::{ChatPromptTemplate, MessagePromptTemplate};

const ROUTER_SYSTEM: &str = "\
You are the routing assistant of a vacation planner.

Decide whether the user's latest message asks for vacation planning or needs a casual reply.

Rules:
1. If the message is about a vacation, trip, travel, holiday, itinerary, flights or budget:
   - It names BOTH a destination and a number of days: status \"PLANNING\", answer null.
   - It names a destination but no number of days: status \"CASUAL\", answer asks how many days they want to stay.
   - It gives a number of days but no destination: status \"CASUAL\", answer asks which place they want to visit.
   - It mentions a vacation with NEITHER destination nor days: status \"CASUAL\", answer politely confirms and asks for both.
2. If the message is unrelated to vacations: status \"CASUAL\", answer is a natural reply.

Use the conversation so far to fill in details the latest message leaves out.";

const ROUTER_HUMAN: &str = "\
Conversation so far:
{{history}}

Latest message:
{{query}}";

const DESTINATION_SYSTEM: &str = "\
You are a vacation assistant. Use ONLY the travel brochure context you are given.

Rules:
- If the destination the user mentions is NOT in the context, set \"found\" to false and every other field to null.
- If the destination is found, fill every field the context supports and leave the rest null.
- \"highlights\" is an array of strings when present, otherwise null.
- Reply with JSON only: no markdown, no explanations.";

const DESTINATION_HUMAN: &str = "\
Context:
{{context}}

User query:
{{query}}";

const BUDGET_SYSTEM: &str = "\
You are a vacation budget planner.

Estimate the total budget using ONLY these details:
1. The number of days in the user's query.
2. The trip details.
3. The flight information.
4. The weather, only where it changes costs.

- Break the cost down into flights, accommodation, meals and any other costs the trip details mention.
- If the package price already includes meals or hotels, do not add them again.
- If some cost is missing, state the assumption you made (for example \"assuming $50/day for meals\").
- Do not mention packages or deals unless the trip details provide them.
- End casually with the final budget and ask: \"Would you like to proceed? If yes, please reply with 'proceed' and I will generate a detailed itinerary for you.\"

Example: \"For a 7-day trip to Karachi, including flights, meals, hotel, and transport, the estimated budget comes out to around $2,350. Would you like to proceed? If yes, reply with 'proceed' and I'll create your detailed itinerary.\"";

const BUDGET_HUMAN: &str = "\
User query:
{{query}}

Trip details:
{{destination_info}}

Flight info:
{{flight_info}}

Weather info:
{{weather_info}}";

const ITINERARY_SYSTEM: &str = "\
You are a professional travel planner.

Using the destination information, flight details, weather and budget estimate, write a detailed day-by-day itinerary (Day 1, Day 2, ...).
Include for each day:
- flight timings when available
- accommodation suggestions
- meals (breakfast, lunch, dinner)
- activities and highlights
- weather context so the traveller can plan clothing and activities

Match the number of days in the user's query. Write in a friendly, conversational tone. Do not repeat the exact budget; focus on the schedule and the experience.";

const ITINERARY_HUMAN: &str = "\
Conversation so far:
{{history}}

User query:
{{query}}

Destination info:
{{destination_info}}

Flight info:
{{flight_info}}

Weather info:
{{weather_info}}

Budget info:
{{budget_info}}";

/// Chat prompts for the four LLM-backed steps.
///
/// Variables: router `query`, `history`; destination `query`, `context`;
/// budget `query`, `destination_info`, `flight_info`, `weather_info`;
/// itinerary the budget variables plus `budget_info` and `history`.
#[derive(Clone, Debug)]
pub struct PlannerPrompts {
    pub router: ChatPromptTemplate,
    pub destination: ChatPromptTemplate,
    pub budget: ChatPromptTemplate,
    pub itinerary: ChatPromptTemplate,
}

fn chat(system: &str, human: &str) -> ChatPromptTemplate {
    ChatPromptTemplate::new(vec![
        MessagePromptTemplate::system(system),
        MessagePromptTemplate::human(human),
    ])
}

impl Default for PlannerPrompts {
    fn default() -> Self {
        Self {
            router: chat(ROUTER_SYSTEM, ROUTER_HUMAN),
            destination: chat(DESTINATION_SYSTEM, DESTINATION_HUMAN),
            budget: chat(BUDGET_SYSTEM, BUDGET_HUMAN),
            itinerary: chat(ITINERARY_SYSTEM, ITINERARY_HUMAN),
        }
    }
}
