//! Embedded single-page chat UI.
//!
//! Served at `/` so the relay is usable without a separate frontend.
//! All model text reaches the DOM through `textContent`, never
//! `innerHTML`.

pub const CHAT_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chat with Rowan</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #0d1117;
            color: #c9d1d9;
            height: 100vh;
            display: flex;
            flex-direction: column;
        }
        .header {
            background: #161b22;
            border-bottom: 1px solid #30363d;
            padding: 16px 24px;
        }
        .header h1 {
            font-size: 16px;
            color: #58a6ff;
        }
        .header p {
            font-size: 13px;
            color: #8b949e;
            margin-top: 4px;
        }
        .messages {
            flex: 1;
            overflow-y: auto;
            padding: 16px 24px;
        }
        .message {
            margin-bottom: 16px;
            max-width: 80%;
        }
        .message.user {
            margin-left: auto;
        }
        .message .bubble {
            padding: 10px 14px;
            border-radius: 12px;
            font-size: 14px;
            line-height: 1.5;
            white-space: pre-wrap;
        }
        .message.user .bubble {
            background: #1f6feb;
            color: #fff;
            border-bottom-right-radius: 4px;
        }
        .message.bot .bubble {
            background: #21262d;
            border: 1px solid #30363d;
            border-bottom-left-radius: 4px;
        }
        .input-area {
            background: #161b22;
            border-top: 1px solid #30363d;
            padding: 16px 24px;
            display: flex;
            gap: 12px;
        }
        .input-area input {
            flex: 1;
            background: #0d1117;
            border: 1px solid #30363d;
            border-radius: 8px;
            padding: 10px 14px;
            color: #c9d1d9;
            font-size: 14px;
            outline: none;
        }
        .input-area input:focus {
            border-color: #58a6ff;
        }
        .input-area input:disabled {
            opacity: 0.5;
        }
        .input-area button {
            background: #238636;
            color: #fff;
            border: none;
            border-radius: 8px;
            padding: 10px 20px;
            font-size: 14px;
            cursor: pointer;
            font-weight: 500;
        }
        .input-area button:hover {
            background: #2ea043;
        }
        .input-area button:disabled {
            background: #21262d;
            color: #484f58;
            cursor: not-allowed;
        }
        .error-msg {
            background: #f8514920;
            border: 1px solid #f85149;
            color: #f85149;
            border-radius: 8px;
            padding: 10px 14px;
            margin: 8px 24px;
            font-size: 13px;
        }
    </style>
</head>
<body>
    <div class="header">
        <h1>Chat with Rowan</h1>
        <p>Ask about skills, projects, experience, or anything on the resume.</p>
    </div>
    <div class="messages" id="messages"></div>
    <div class="input-area">
        <input type="text" id="user-input" placeholder="Ask Rowan something..." maxlength="300" autofocus>
        <button id="send-btn" onclick="sendMessage()">Send</button>
    </div>

    <script>
        const messagesDiv = document.getElementById('messages');
        const userInput = document.getElementById('user-input');
        const sendBtn = document.getElementById('send-btn');
        const history = [];

        userInput.addEventListener('keydown', function(e) {
            if (e.key === 'Enter' && !e.shiftKey) {
                e.preventDefault();
                sendMessage();
            }
        });

        async function sendMessage() {
            const message = userInput.value.trim();
            if (!message) return;

            userInput.value = '';
            userInput.disabled = true;
            sendBtn.disabled = true;

            appendMessage('user', message);
            const botBubble = appendMessage('bot', '');

            try {
                const resp = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ message: message, history: history })
                });

                if (!resp.ok) {
                    const err = await resp.json().catch(() => ({}));
                    showError(err.error || 'Request failed');
                } else {
                    await readStream(resp.body, botBubble);
                    history.push({ role: 'user', content: message });
                    history.push({ role: 'bot', content: botBubble.textContent });
                }
            } catch (e) {
                showError('Network error: ' + e.message);
            }

            if (!botBubble.textContent) {
                botBubble.parentElement.remove();
            }
            userInput.disabled = false;
            sendBtn.disabled = false;
            userInput.focus();
        }

        async function readStream(body, bubble) {
            const reader = body.getReader();
            const decoder = new TextDecoder();
            let buffer = '';

            while (true) {
                const { value, done } = await reader.read();
                if (done) break;
                buffer += decoder.decode(value, { stream: true });

                let idx;
                while ((idx = buffer.indexOf('\n\n')) !== -1) {
                    const frame = buffer.slice(0, idx);
                    buffer = buffer.slice(idx + 2);
                    for (const line of frame.split('\n')) {
                        if (!line.startsWith('data:')) continue;
                        handlePayload(line.slice(5).trim(), bubble);
                    }
                }
            }
        }

        function handlePayload(payload, bubble) {
            if (!payload) return;
            try {
                const data = JSON.parse(payload);
                if (data.text) {
                    bubble.textContent += data.text;
                    messagesDiv.scrollTop = messagesDiv.scrollHeight;
                } else if (data.error) {
                    showError(data.error);
                }
            } catch (e) {
                // Skip frames that are not JSON.
            }
        }

        function appendMessage(role, content) {
            const div = document.createElement('div');
            div.className = 'message ' + role;

            const bubble = document.createElement('div');
            bubble.className = 'bubble';
            bubble.textContent = content;
            div.appendChild(bubble);

            messagesDiv.appendChild(div);
            messagesDiv.scrollTop = messagesDiv.scrollHeight;
            return bubble;
        }

        function showError(msg) {
            const div = document.createElement('div');
            div.className = 'error-msg';
            div.textContent = msg;
            messagesDiv.appendChild(div);
            messagesDiv.scrollTop = messagesDiv.scrollHeight;
        }
    </script>
</body>
</html>"##;
