/// Instruction template for one thread; `<messages>` is replaced with the
/// newline-joined `author: text` transcript
pub const DEFAULT_TOPIC_PROMPT: &str = "Ниже сообщения из обсуждения в чате.
Определи темы обсуждения и верни только их названия:
- каждая тема описывается 3-4 словами;
- темы упорядочены по важности, самая важная первой;
- если по теме всего несколько сообщений и это шум или офтоп, не включай её.
Не добавляй пояснений, нумерации и кавычек.

Сообщения:
<messages>";

pub const MESSAGES_PLACEHOLDER: &str = "<messages>";
